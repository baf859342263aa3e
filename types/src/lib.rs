//! Core domain types for Emporium.
//!
//! Pure data: ids and slugs, catalog entries, themes, customers and the
//! store document itself. No IO, no async.

mod catalog;
mod customer;
mod ids;
mod store;
mod theme;

pub use catalog::{Category, Gold, Product, ProductUpdate, Rarity, UnknownCategory};
pub use customer::{CHARACTER_CLASSES, CustomerDetails};
pub use ids::{Slug, SlugError, StoreId, StoreIdError};
pub use store::StoreConfig;
pub use theme::{FontFamily, LayoutType, StoreTheme, ThemeUpdate, ThemeValueError};
