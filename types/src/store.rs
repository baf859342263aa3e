//! Store documents: one per storefront ("domain").

use serde::{Deserialize, Serialize};

use crate::catalog::{Category, Gold, Product, ProductUpdate, Rarity};
use crate::ids::{Slug, StoreId};
use crate::theme::{StoreTheme, ThemeUpdate};

/// Complete configuration of one storefront.
///
/// Serialized with camelCase keys; this is the document the HTTP API and the
/// repository exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    pub id: StoreId,
    pub slug: Slug,
    pub store_name: String,
    #[serde(default)]
    pub store_tagline: String,
    #[serde(default)]
    pub theme: StoreTheme,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl StoreConfig {
    pub const DEFAULT_ID: &'static str = "default";
    pub const DEFAULT_SLUG: &'static str = "emporio-padrao";
    pub const NEW_STORE_NAME: &'static str = "Nova Loja RPG";
    pub const NEW_PRODUCT_NAME: &'static str = "Novo Item";
    const NEW_PRODUCT_PRICE: Gold = Gold::new(10);
    const NEW_PRODUCT_IMAGE: &'static str = "https://picsum.photos/id/1015/400/300";

    /// The built-in storefront shown when nothing has been persisted yet.
    #[must_use]
    pub fn default_store() -> Self {
        Self {
            id: StoreId::new(Self::DEFAULT_ID).expect("DEFAULT_ID is non-empty"),
            slug: Slug::parse(Self::DEFAULT_SLUG).expect("DEFAULT_SLUG is a valid slug"),
            store_name: "O Empório do Dragão Dourado".to_string(),
            store_tagline: "Fornecedor Oficial do Reino de Arton".to_string(),
            theme: StoreTheme::default(),
            products: vec![
                Product {
                    id: "1".to_string(),
                    name: "Espada Longa do Valente".to_string(),
                    description: "Uma lâmina de aço forjada por anões nas profundezas de Erebor."
                        .to_string(),
                    price: Gold::new(150),
                    category: Category::Weapon,
                    image: "https://images.unsplash.com/photo-1589131008221-9fd440d91814?auto=format&fit=crop&q=80&w=400".to_string(),
                    rarity: Some(Rarity::Uncommon),
                    stock: None,
                },
                Product {
                    id: "2".to_string(),
                    name: "Poção de Vida Maior".to_string(),
                    description: "Restaura 50 pontos de vida. Contém extrato de erva-de-fogo."
                        .to_string(),
                    price: Gold::new(45),
                    category: Category::Potion,
                    image: "https://images.unsplash.com/photo-1514467958571-337553f19114?auto=format&fit=crop&q=80&w=400".to_string(),
                    rarity: Some(Rarity::Common),
                    stock: None,
                },
            ],
        }
    }

    /// A new store cloned from the default template under a fresh id.
    #[must_use]
    pub fn new_from_template(id: StoreId) -> Self {
        let slug = Slug::for_new_store(&id);
        Self {
            id,
            slug,
            store_name: Self::NEW_STORE_NAME.to_string(),
            ..Self::default_store()
        }
    }

    #[must_use]
    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Put a placeholder item at the top of the catalog. The id is the
    /// creation time in milliseconds, bumped past any id already listed.
    pub fn add_product(&mut self, now_millis: u128) -> &Product {
        let mut millis = now_millis;
        while self.product(&millis.to_string()).is_some() {
            millis += 1;
        }
        self.products.insert(
            0,
            Product {
                id: millis.to_string(),
                name: Self::NEW_PRODUCT_NAME.to_string(),
                description: "...".to_string(),
                price: Self::NEW_PRODUCT_PRICE,
                category: Category::Misc,
                image: Self::NEW_PRODUCT_IMAGE.to_string(),
                rarity: None,
                stock: None,
            },
        );
        &self.products[0]
    }

    /// Edit a product in place. Returns false when no product has `product_id`.
    pub fn update_product(&mut self, product_id: &str, update: ProductUpdate) -> bool {
        match self.products.iter_mut().find(|p| p.id == product_id) {
            Some(product) => {
                update.apply(product);
                true
            }
            None => false,
        }
    }

    pub fn remove_product(&mut self, product_id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != product_id);
        self.products.len() != before
    }

    pub fn update_theme(&mut self, update: ThemeUpdate) {
        update.apply(&mut self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::StoreConfig;
    use crate::{
        Category, FontFamily, Gold, LayoutType, ProductUpdate, StoreId, ThemeUpdate,
    };

    #[test]
    fn default_store_has_starter_catalog() {
        let store = StoreConfig::default_store();
        assert_eq!(store.slug.as_str(), "emporio-padrao");
        assert_eq!(store.products.len(), 2);
        assert!(store.product("1").is_some());
        assert!(store.product("99").is_none());
    }

    #[test]
    fn template_store_gets_fresh_identity() {
        let store = StoreConfig::new_from_template(StoreId::from_millis(1_712_345_678_901));
        assert_eq!(store.id.as_str(), "1712345678901");
        assert_eq!(store.slug.as_str(), "loja-8901");
        assert_eq!(store.store_name, "Nova Loja RPG");
        assert_eq!(store.products, StoreConfig::default_store().products);
    }

    #[test]
    fn added_product_goes_first_with_placeholder_values() {
        let mut store = StoreConfig::default_store();
        let added = store.add_product(1_712_000_000_000).clone();
        assert_eq!(added.id, "1712000000000");
        assert_eq!(added.name, "Novo Item");
        assert_eq!(added.description, "...");
        assert_eq!(added.price, Gold::new(10));
        assert_eq!(added.category, Category::Misc);
        assert!(added.image.starts_with("https://picsum.photos/"));
        assert_eq!(store.products.len(), 3);
        assert_eq!(store.products[0], added);
    }

    #[test]
    fn added_product_ids_stay_unique() {
        let mut store = StoreConfig::default_store();
        store.add_product(500);
        let second = store.add_product(500).id.clone();
        assert_eq!(second, "501");
        assert_eq!(store.products[1].id, "500");
    }

    #[test]
    fn update_product_in_place() {
        let mut store = StoreConfig::default_store();
        let update = ProductUpdate {
            name: Some("Espada Curta".to_string()),
            price: Some(Gold::new(90)),
            ..ProductUpdate::default()
        };
        assert!(store.update_product("1", update.clone()));
        let product = store.product("1").unwrap();
        assert_eq!(product.name, "Espada Curta");
        assert_eq!(product.price, Gold::new(90));
        assert_eq!(product.category, Category::Weapon);
        assert_eq!(store.products[0].id, "1");

        assert!(!store.update_product("99", update));
    }

    #[test]
    fn remove_product_by_id() {
        let mut store = StoreConfig::default_store();
        assert!(store.remove_product("2"));
        assert!(!store.remove_product("2"));
        assert_eq!(store.products.len(), 1);
        assert!(store.product("1").is_some());
    }

    #[test]
    fn theme_update_keeps_other_fields() {
        let mut store = StoreConfig::default_store();
        store.update_theme(ThemeUpdate {
            layout_type: Some(LayoutType::Compact),
            ..ThemeUpdate::default()
        });
        assert_eq!(store.theme.layout_type, LayoutType::Compact);
        assert_eq!(store.theme.primary_color, "#d4af37");
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let value = serde_json::to_value(StoreConfig::default_store()).unwrap();
        assert!(value.get("storeName").is_some());
        assert!(value.get("storeTagline").is_some());
        assert_eq!(value["theme"]["primaryColor"], "#d4af37");
        assert_eq!(value["theme"]["fontFamily"], "Cinzel");
        assert_eq!(value["theme"]["layoutType"], "grid");
    }

    #[test]
    fn json_round_trips_minimal_document() {
        let json = r#"{"id":"42","slug":"taverna","storeName":"Taverna"}"#;
        let store: StoreConfig = serde_json::from_str(json).unwrap();
        assert_eq!(store.store_tagline, "");
        assert!(store.products.is_empty());
        assert_eq!(store.theme.font_family, FontFamily::Cinzel);
        assert_eq!(store.theme.layout_type, LayoutType::Grid);
    }

    #[test]
    fn json_rejects_invalid_slug() {
        let json = r#"{"id":"42","slug":"Bad Slug","storeName":"Taverna"}"#;
        assert!(serde_json::from_str::<StoreConfig>(json).is_err());
    }
}
