//! Emporium CLI - storefront API server and receipt tooling.
//!
//! ```text
//! emporium serve                    JSON API over the store database
//! emporium token generate|verify    receipt tokens (RPG-XXXX-YYYY-DDDD)
//! emporium store list|show|create|import|edit|delete|resolve
//! emporium store product list|add|update|remove
//! emporium checkout                 buy from a store and print the receipt
//! ```
//!
//! `serve` logs to stderr. Every other command logs to
//! `~/.emporium/logs/emporium.log` so stdout stays clean for piping.

mod commands;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use emporium_config::EmporiumConfig;
use emporium_store::StoreRepository;
use emporium_types::{
    CHARACTER_CLASSES, Category, CustomerDetails, FontFamily, Gold, LayoutType, ProductUpdate,
    Slug, ThemeUpdate,
};

use crate::commands::{CheckoutRequest, ItemSpec, StoreEdit};

#[derive(Parser)]
#[command(name = "emporium", version)]
#[command(about = "RPG storefront server and receipt token tooling")]
struct Cli {
    /// Config file (default: ~/.emporium/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Store database path, overriding config and EMPORIUM_DB
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the JSON HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<IpAddr>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate or check receipt tokens
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },
    /// Manage stored storefronts
    Store {
        #[command(subcommand)]
        action: StoreCommand,
    },
    /// Buy from a store and print the receipt
    Checkout(CheckoutArgs),
}

#[derive(Subcommand)]
enum TokenCommand {
    /// Print fresh tokens, one per line
    Generate {
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check a typed token (exit 1 if invalid)
    Verify {
        /// Token text; trimmed and uppercased before checking
        input: String,
    },
}

#[derive(Subcommand)]
enum StoreCommand {
    /// List stores with their share links
    List {
        /// Origin used for share links (default: the configured server address)
        #[arg(long)]
        origin: Option<String>,
    },
    /// Print a store document
    Show {
        slug: String,
        /// Print the theme as CSS variables instead
        #[arg(long)]
        css: bool,
    },
    /// Create a store from the default template
    Create,
    /// Upsert a store document from a JSON file
    Import { file: PathBuf },
    /// Change a store's title, tagline, slug or theme
    Edit(EditArgs),
    /// Edit a store's product catalog
    Product {
        #[command(subcommand)]
        action: ProductCommand,
    },
    /// Remove a store by id
    Delete { id: String },
    /// Show which store and view a share link opens
    Resolve {
        /// Share link or bare query, e.g. "?s=loja-1234&role=adm"
        link: String,
    },
}

#[derive(Args)]
struct EditArgs {
    /// Slug of the store to edit
    slug: String,
    /// Store title
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    tagline: Option<String>,
    /// New slug for share links
    #[arg(long = "new-slug")]
    new_slug: Option<Slug>,
    /// Primary theme color, e.g. "#d4af37"
    #[arg(long)]
    primary_color: Option<String>,
    /// Cinzel, Lato, Serif or Monospace
    #[arg(long)]
    font: Option<FontFamily>,
    /// grid, list or compact
    #[arg(long)]
    layout: Option<LayoutType>,
    #[arg(long)]
    banner_image: Option<String>,
}

#[derive(Subcommand)]
enum ProductCommand {
    /// List the catalog
    List { slug: String },
    /// Add a placeholder item at the top of the catalog
    Add { slug: String },
    /// Change fields of an item
    Update {
        slug: String,
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Price in gold pieces
        #[arg(long)]
        price: Option<u64>,
        /// weapon, armor, potion, misc, scroll or artifact
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        stock: Option<u32>,
    },
    /// Remove an item
    Remove { slug: String, id: String },
}

#[derive(Args)]
struct CheckoutArgs {
    /// Store slug
    #[arg(long)]
    store: String,
    /// Character name
    #[arg(long)]
    name: String,
    /// Character class
    #[arg(long, default_value = CHARACTER_CLASSES[0])]
    class: String,
    /// Guild name
    #[arg(long)]
    guild: Option<String>,
    /// Gold pieces the character carries
    #[arg(long)]
    budget: u64,
    /// Product to buy as ID or ID:QTY; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<ItemSpec>,
    /// Also write the receipt into this directory
    #[arg(long)]
    save: Option<PathBuf>,
}

fn init_tracing(to_stderr: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if to_stderr {
        registry.with(fmt::layer().with_writer(io::stderr)).init();
        return;
    }

    match open_log_file() {
        Some((path, file)) => {
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
            tracing::debug!(path = %path.display(), "logging initialized");
        }
        // Nowhere writable: stay silent rather than mixing logs into output.
        None => registry.init(),
    }
}

/// First writable of the data-dir log file and `./.emporium/logs/emporium.log`.
fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let local = PathBuf::from(".emporium").join("logs").join("emporium.log");
    [emporium_config::log_path(), local]
        .into_iter()
        .find_map(|path| {
            fs::create_dir_all(path.parent()?).ok()?;
            let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
            Some((path, file))
        })
}

fn load_config(cli: &Cli) -> Result<EmporiumConfig> {
    let mut config = match &cli.config {
        Some(path) => EmporiumConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EmporiumConfig::load().context("Failed to load config")?,
    };
    if let Some(db) = &cli.db {
        config.store.database_path.clone_from(db);
    }
    Ok(config)
}

fn open_repository(config: &EmporiumConfig) -> Result<StoreRepository> {
    let mut repo = StoreRepository::open(&config.store.database_path)?;
    if repo.seed_default_if_empty()? {
        tracing::info!("seeded default store");
    }
    Ok(repo)
}

fn now_millis() -> Result<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .context("System clock is before the Unix epoch")
}

fn run_product_command(
    out: &mut impl Write,
    repo: &mut StoreRepository,
    action: ProductCommand,
) -> Result<()> {
    match action {
        ProductCommand::List { slug } => commands::list_products(out, repo, &slug),
        ProductCommand::Add { slug } => {
            commands::add_product(out, repo, &slug, now_millis()?).map(|_| ())
        }
        ProductCommand::Update {
            slug,
            id,
            name,
            description,
            price,
            category,
            image,
            stock,
        } => {
            let update = ProductUpdate {
                name,
                description,
                price: price.map(Gold::new),
                category,
                image,
                stock,
            };
            commands::update_product(out, repo, &slug, &id, update)
        }
        ProductCommand::Remove { slug, id } => commands::remove_product(out, repo, &slug, &id),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Serve { .. }));

    let mut config = load_config(&cli)?;

    if let Commands::Serve { bind, port } = cli.command {
        if let Some(bind) = bind {
            config.server.bind = bind;
        }
        if let Some(port) = port {
            config.server.port = port;
        }
        let repo = open_repository(&config)?;
        emporium_server::serve(config.server.socket_addr(), repo).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Serve { .. } => {}
        Commands::Token { action } => match action {
            TokenCommand::Generate { count, seed } => {
                commands::generate_tokens(&mut out, count, seed)?;
            }
            TokenCommand::Verify { input } => {
                if !commands::verify(&mut out, &input)? {
                    out.flush()?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        },
        Commands::Store { action } => {
            let mut repo = open_repository(&config)?;
            match action {
                StoreCommand::List { origin } => {
                    let origin = origin
                        .unwrap_or_else(|| format!("http://{}", config.server.socket_addr()));
                    commands::list_stores(&mut out, &repo, &origin)?;
                }
                StoreCommand::Show { slug, css } => {
                    commands::show_store(&mut out, &repo, &slug, css)?;
                }
                StoreCommand::Create => {
                    commands::create_store(&mut out, &mut repo, now_millis()?)?;
                }
                StoreCommand::Import { file } => {
                    commands::import_store(&mut out, &mut repo, &file)?;
                }
                StoreCommand::Edit(args) => {
                    let edit = StoreEdit {
                        name: args.name,
                        tagline: args.tagline,
                        slug: args.new_slug,
                        theme: ThemeUpdate {
                            primary_color: args.primary_color,
                            font_family: args.font,
                            layout_type: args.layout,
                            banner_image: args.banner_image,
                        },
                    };
                    commands::edit_store(&mut out, &mut repo, &args.slug, edit)?;
                }
                StoreCommand::Product { action } => {
                    run_product_command(&mut out, &mut repo, action)?;
                }
                StoreCommand::Delete { id } => {
                    commands::delete_store(&mut out, &mut repo, &id)?;
                }
                StoreCommand::Resolve { link } => {
                    commands::resolve_link(&mut out, &repo, &link)?;
                }
            }
        }
        Commands::Checkout(args) => {
            let repo = open_repository(&config)?;
            let customer = CustomerDetails {
                guild: args.guild,
                ..CustomerDetails::new(args.name, args.class)
            };
            let request = CheckoutRequest {
                store_slug: args.store,
                customer,
                budget: Gold::new(args.budget),
                items: args.items,
                save_dir: args.save,
            };
            commands::checkout(&mut out, &repo, &request)?;
        }
    }

    out.flush()?;
    Ok(ExitCode::SUCCESS)
}
