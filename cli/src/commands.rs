//! One-shot subcommands. Each writes its human-readable result to `out`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;

use emporium_core::{Cart, Checkout, StoreDirectory, share_url, theme_stylesheet};
use emporium_receipt::{Invoice, generate_token, generate_token_with, normalize_input, verify_token};
use emporium_store::StoreRepository;
use emporium_types::{CustomerDetails, Gold, ProductUpdate, Slug, StoreConfig, ThemeUpdate};

/// `ID[:QTY]` as given to `checkout --item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: String,
    pub quantity: u64,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = match s.split_once(':') {
            Some((id, qty)) => {
                let quantity: u64 = qty
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid quantity {qty:?}"))?;
                (id, quantity)
            }
            None => (s, 1),
        };
        let id = id.trim();
        if id.is_empty() {
            return Err("product id must not be empty".to_string());
        }
        if quantity == 0 {
            return Err("quantity must be at least 1".to_string());
        }
        Ok(Self {
            product_id: id.to_string(),
            quantity,
        })
    }
}

/// Copy, slug and theme changes for `store edit`.
#[derive(Debug, Clone, Default)]
pub struct StoreEdit {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub slug: Option<Slug>,
    pub theme: ThemeUpdate,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub store_slug: String,
    pub customer: CustomerDetails,
    pub budget: Gold,
    pub items: Vec<ItemSpec>,
    pub save_dir: Option<PathBuf>,
}

// ============================================================================
// TOKENS
// ============================================================================

pub fn generate_tokens(out: &mut impl Write, count: usize, seed: Option<u64>) -> Result<()> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            for _ in 0..count {
                writeln!(out, "{}", generate_token_with(&mut rng))?;
            }
        }
        None => {
            for _ in 0..count {
                writeln!(out, "{}", generate_token())?;
            }
        }
    }
    Ok(())
}

/// Normalize and check `input`. Returns the verdict so the caller can set
/// the exit status.
pub fn verify(out: &mut impl Write, input: &str) -> Result<bool> {
    let normalized = normalize_input(input);
    match verify_token(&normalized) {
        Ok(token) => {
            writeln!(out, "valid: {token}")?;
            Ok(true)
        }
        Err(rejection) => {
            writeln!(out, "invalid: {normalized} ({rejection})")?;
            Ok(false)
        }
    }
}

// ============================================================================
// STORES
// ============================================================================

pub fn list_stores(out: &mut impl Write, repo: &StoreRepository, origin: &str) -> Result<()> {
    let stores = repo.list().context("Failed to list stores")?;
    if stores.is_empty() {
        writeln!(out, "no stores")?;
        return Ok(());
    }
    for stored in stores {
        let store = &stored.config;
        writeln!(
            out,
            "{:<16} {:<32} {}",
            store.id,
            store.store_name,
            share_url(origin, &store.slug)
        )?;
    }
    Ok(())
}

pub fn show_store(
    out: &mut impl Write,
    repo: &StoreRepository,
    slug: &str,
    css: bool,
) -> Result<()> {
    let Some(stored) = repo.find_by_slug(slug)? else {
        bail!("no store with slug {slug:?}");
    };
    if css {
        write!(out, "{}", theme_stylesheet(&stored.config.theme))?;
    } else {
        let json = serde_json::to_string_pretty(&stored).context("Failed to encode store")?;
        writeln!(out, "{json}")?;
    }
    Ok(())
}

/// Create a store from the default template and persist it.
pub fn create_store(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    now_millis: u128,
) -> Result<StoreConfig> {
    let existing = repo
        .list()?
        .into_iter()
        .map(|stored| stored.config)
        .collect();
    let mut directory = StoreDirectory::new(existing);
    let store = directory.create_store(now_millis);
    repo.upsert(&store)
        .with_context(|| format!("Failed to save new store {}", store.id))?;
    writeln!(out, "created {} ({})", store.slug, store.id)?;
    Ok(store)
}

/// Upsert a store document read from a JSON file.
pub fn import_store(out: &mut impl Write, repo: &mut StoreRepository, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let store: StoreConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse store document {}", path.display()))?;
    let saved = repo.upsert(&store)?;
    writeln!(
        out,
        "saved {} ({}), updated {}",
        saved.config.slug, saved.config.id, saved.updated_at
    )?;
    Ok(())
}

/// Show what a share link opens: the active store, the view and whether
/// the editor is unlocked.
pub fn resolve_link(out: &mut impl Write, repo: &StoreRepository, query: &str) -> Result<()> {
    let query = query.split_once('?').map_or(query, |(_, q)| q);
    let stores = repo
        .list()?
        .into_iter()
        .map(|stored| stored.config)
        .collect();
    let directory = StoreDirectory::from_query(stores, query);
    let active = directory.active();
    writeln!(out, "store: {} ({})", active.store_name, active.slug)?;
    writeln!(out, "view:  {:?}", directory.view())?;
    writeln!(out, "admin: {}", if directory.is_admin() { "yes" } else { "no" })?;
    Ok(())
}

/// Apply copy and theme edits to a stored store and save it.
pub fn edit_store(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    slug: &str,
    edit: StoreEdit,
) -> Result<()> {
    if edit.name.is_none() && edit.tagline.is_none() && edit.slug.is_none() && edit.theme.is_empty()
    {
        bail!("nothing to change; pass at least one option");
    }
    let mut store = load_store(repo, slug)?;
    if let Some(name) = edit.name {
        store.store_name = name;
    }
    if let Some(tagline) = edit.tagline {
        store.store_tagline = tagline;
    }
    if let Some(slug) = edit.slug {
        store.slug = slug;
    }
    store.update_theme(edit.theme);
    let saved = repo.upsert(&store)?;
    writeln!(out, "saved {} ({})", saved.config.slug, saved.config.id)?;
    Ok(())
}

pub fn list_products(out: &mut impl Write, repo: &StoreRepository, slug: &str) -> Result<()> {
    let store = load_store(repo, slug)?;
    if store.products.is_empty() {
        writeln!(out, "no products")?;
    }
    for product in &store.products {
        writeln!(
            out,
            "{:<16} {:<32} {:<9} {:>10}",
            product.id,
            product.name,
            product.category.as_str(),
            product.price.to_string()
        )?;
    }
    Ok(())
}

/// Add a placeholder product at the top of the catalog and save.
pub fn add_product(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    slug: &str,
    now_millis: u128,
) -> Result<String> {
    let mut store = load_store(repo, slug)?;
    let id = store.add_product(now_millis).id.clone();
    repo.upsert(&store)?;
    writeln!(out, "added product {id} to {slug}")?;
    Ok(id)
}

pub fn update_product(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    slug: &str,
    product_id: &str,
    update: ProductUpdate,
) -> Result<()> {
    if update.is_empty() {
        bail!("nothing to change; pass at least one option");
    }
    let mut store = load_store(repo, slug)?;
    if !store.update_product(product_id, update) {
        bail!("store {slug} has no product {product_id:?}");
    }
    repo.upsert(&store)?;
    writeln!(out, "updated product {product_id}")?;
    Ok(())
}

pub fn remove_product(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    slug: &str,
    product_id: &str,
) -> Result<()> {
    let mut store = load_store(repo, slug)?;
    if !store.remove_product(product_id) {
        bail!("store {slug} has no product {product_id:?}");
    }
    repo.upsert(&store)?;
    writeln!(out, "removed product {product_id}")?;
    Ok(())
}

fn load_store(repo: &StoreRepository, slug: &str) -> Result<StoreConfig> {
    match repo.find_by_slug(slug)? {
        Some(stored) => Ok(stored.config),
        None => bail!("no store with slug {slug:?}"),
    }
}

pub fn delete_store(out: &mut impl Write, repo: &mut StoreRepository, id: &str) -> Result<()> {
    if repo.delete(id)? {
        writeln!(out, "removed {id}")?;
    } else {
        writeln!(out, "no store with id {id:?}")?;
    }
    Ok(())
}

// ============================================================================
// CHECKOUT
// ============================================================================

/// Fill a cart from the named store, check out against the budget and print
/// the receipt. With `save_dir`, the receipt is also written as a file.
pub fn checkout(
    out: &mut impl Write,
    repo: &StoreRepository,
    request: &CheckoutRequest,
) -> Result<Invoice> {
    let store = load_store(repo, &request.store_slug)?;

    let mut cart = Cart::new();
    for item in &request.items {
        let Some(product) = store.product(&item.product_id) else {
            bail!(
                "store {} has no product {:?}",
                store.slug,
                item.product_id
            );
        };
        cart.add_many(product, item.quantity);
    }

    let invoice = Checkout::new(request.customer.clone(), request.budget)
        .complete(&store.store_name, &cart)?;

    write!(out, "{}", invoice.render_text())?;
    writeln!(out, "QR: {}", invoice.qr_payload())?;

    if let Some(dir) = &request.save_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(invoice.download_file_name());
        fs::write(&path, invoice.render_text())
            .with_context(|| format!("Failed to write receipt {}", path.display()))?;
        writeln!(out, "saved {}", path.display())?;
    }

    Ok(invoice)
}
