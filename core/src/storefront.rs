//! Storefront directory: the loaded stores, which one is active, and the
//! current view.
//!
//! Share links carry the store as `?s=<slug>`; `role=adm` unlocks the editor.
//! There is no authentication behind the admin flag.

use serde::Serialize;

use emporium_types::{Slug, StoreConfig, StoreId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum View {
    #[default]
    Hub,
    Shop,
    Checkout,
    Invoice,
    Editor,
}

/// Parsed launch parameters from a storefront URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchParams {
    pub slug: Option<String>,
    pub admin: bool,
}

impl LaunchParams {
    /// Parse `s=<slug>&role=adm` style queries. A leading `?` is ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "s" if !value.is_empty() => params.slug = Some(value.to_string()),
                "role" => params.admin = value == "adm",
                _ => {}
            }
        }
        params
    }
}

#[derive(Debug, Clone)]
pub struct StoreDirectory {
    stores: Vec<StoreConfig>,
    active_id: Option<StoreId>,
    view: View,
    admin: bool,
}

impl StoreDirectory {
    #[must_use]
    pub fn new(stores: Vec<StoreConfig>) -> Self {
        Self {
            stores,
            active_id: None,
            view: View::Hub,
            admin: false,
        }
    }

    /// Build the directory the way a page load does: select the store named
    /// by `s=` (switching to the shop) and honor `role=adm`. Unknown slugs
    /// leave the hub showing.
    #[must_use]
    pub fn from_query(stores: Vec<StoreConfig>, query: &str) -> Self {
        let params = LaunchParams::parse(query);
        let mut directory = Self::new(stores);
        directory.admin = params.admin;
        if let Some(slug) = params.slug.as_deref() {
            if directory.select_by_slug(slug) {
                directory.view = View::Shop;
            } else {
                tracing::warn!(slug, "share link names an unknown store");
            }
        }
        directory
    }

    #[must_use]
    pub fn stores(&self) -> &[StoreConfig] {
        &self.stores
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Switch views. The editor is only reachable in admin mode; returns
    /// whether the switch happened.
    pub fn set_view(&mut self, view: View) -> bool {
        if view == View::Editor && !self.admin {
            return false;
        }
        self.view = view;
        true
    }

    /// Active store, else the first loaded store, else the built-in default.
    #[must_use]
    pub fn active(&self) -> StoreConfig {
        self.active_id
            .as_ref()
            .and_then(|id| self.find(id))
            .or_else(|| self.stores.first())
            .cloned()
            .unwrap_or_else(StoreConfig::default_store)
    }

    pub fn select(&mut self, id: &StoreId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.active_id = Some(id.clone());
        true
    }

    pub fn select_by_slug(&mut self, slug: &str) -> bool {
        let Some(id) = self
            .stores
            .iter()
            .find(|s| s.slug.as_str() == slug)
            .map(|s| s.id.clone())
        else {
            return false;
        };
        self.active_id = Some(id);
        true
    }

    /// Add a new store cloned from the default template. The id is the
    /// creation time in milliseconds.
    pub fn create_store(&mut self, now_millis: u128) -> StoreConfig {
        let store = StoreConfig::new_from_template(StoreId::from_millis(now_millis));
        tracing::info!(id = %store.id, slug = %store.slug, "store created");
        self.stores.push(store.clone());
        store
    }

    /// Replace the store with the same id, or append it when new.
    pub fn upsert(&mut self, store: StoreConfig) {
        match self.stores.iter_mut().find(|s| s.id == store.id) {
            Some(existing) => *existing = store,
            None => self.stores.push(store),
        }
    }

    pub fn remove(&mut self, id: &StoreId) -> bool {
        let before = self.stores.len();
        self.stores.retain(|s| &s.id != id);
        if self.active_id.as_ref() == Some(id) {
            self.active_id = None;
        }
        self.stores.len() != before
    }

    fn find(&self, id: &StoreId) -> Option<&StoreConfig> {
        self.stores.iter().find(|s| &s.id == id)
    }
}

/// Public link for a store: `<origin>/?s=<slug>`.
#[must_use]
pub fn share_url(origin: &str, slug: &Slug) -> String {
    format!("{}/?s={}", origin.trim_end_matches('/'), slug)
}
