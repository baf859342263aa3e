//! Persistence for Emporium store documents.
//!
//! Stores live in a single SQLite table as JSON documents. See
//! [`StoreRepository`] for the operations.

mod repository;
mod sqlite_util;

pub use repository::{StoreError, StoredStore, StoreRepository};
