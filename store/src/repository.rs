//! Store repository - SQLite-backed persistence for store documents.
//!
//! Each storefront is stored as its JSON document keyed by id, with the slug
//! pulled out into a UNIQUE column for lookups. Saving is an upsert by id and
//! the last write wins; there is no version check.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use emporium_types::{Slug, StoreConfig};

use crate::sqlite_util::{now_rfc3339, prepare_db_path};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug {slug} is already used by store {owner}")]
    SlugTaken { slug: Slug, owner: String },
    #[error("stored document for {id} is unreadable: {source}")]
    Corrupt {
        id: String,
        source: serde_json::Error,
    },
    #[error("failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// A store document together with its bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredStore {
    #[serde(flatten)]
    pub config: StoreConfig,
    pub created_at: String,
    pub updated_at: String,
}

pub struct StoreRepository {
    db: Connection,
}

impl StoreRepository {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS stores (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ";

    /// Open or create the repository database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        prepare_db_path(path)?;

        let db = Connection::open(path)
            .with_context(|| format!("Failed to open store database at {}", path.display()))?;
        tracing::debug!(path = %path.display(), "store database opened");
        Self::initialize(db)
    }

    /// Open an in-memory repository (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory store database")?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self> {
        db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")
            .context("Failed to set store database pragmas")?;
        db.execute_batch(Self::SCHEMA)
            .context("Failed to create store schema")?;
        Ok(Self { db })
    }

    /// All stores in creation order.
    pub fn list(&self) -> Result<Vec<StoredStore>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT id, document, created_at, updated_at FROM stores ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], read_row)?;

        let mut stores = Vec::new();
        for row in rows {
            stores.push(decode(row?)?);
        }
        Ok(stores)
    }

    pub fn find_by_slug(&self, slug: &str) -> Result<Option<StoredStore>, StoreError> {
        let row = self
            .db
            .query_row(
                "SELECT id, document, created_at, updated_at FROM stores WHERE slug = ?1",
                params![slug],
                read_row,
            )
            .optional()?;
        row.map(decode).transpose()
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<StoredStore>, StoreError> {
        let row = self
            .db
            .query_row(
                "SELECT id, document, created_at, updated_at FROM stores WHERE id = ?1",
                params![id],
                read_row,
            )
            .optional()?;
        row.map(decode).transpose()
    }

    /// Insert or replace the document with `config.id`.
    ///
    /// `created_at` survives replacement; `updated_at` is bumped. Fails with
    /// [`StoreError::SlugTaken`] when another store owns the slug.
    pub fn upsert(&mut self, config: &StoreConfig) -> Result<StoredStore, StoreError> {
        let document = serde_json::to_string(config).map_err(StoreError::Encode)?;
        let now = now_rfc3339();
        let tx = self.db.transaction()?;

        let owner: Option<String> = tx
            .query_row(
                "SELECT id FROM stores WHERE slug = ?1",
                params![config.slug.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(owner) = owner
            && owner != config.id.as_str()
        {
            return Err(StoreError::SlugTaken {
                slug: config.slug.clone(),
                owner,
            });
        }

        tx.execute(
            "INSERT INTO stores (id, slug, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(id) DO UPDATE SET
                slug = excluded.slug,
                document = excluded.document,
                updated_at = excluded.updated_at",
            params![config.id.as_str(), config.slug.as_str(), document, now],
        )?;

        let row = tx.query_row(
            "SELECT id, document, created_at, updated_at FROM stores WHERE id = ?1",
            params![config.id.as_str()],
            read_row,
        )?;
        tx.commit()?;

        tracing::info!(id = %config.id, slug = %config.slug, "store saved");
        decode(row)
    }

    /// Delete by id. Returns whether a row was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let removed = self
            .db
            .execute("DELETE FROM stores WHERE id = ?1", params![id])?;
        if removed > 0 {
            tracing::info!(id, "store deleted");
        }
        Ok(removed > 0)
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Persist the built-in default store when the repository is empty.
    /// Returns whether it was inserted.
    pub fn seed_default_if_empty(&mut self) -> Result<bool, StoreError> {
        if self.count()? > 0 {
            return Ok(false);
        }
        self.upsert(&StoreConfig::default_store())?;
        Ok(true)
    }
}

struct Row {
    id: String,
    document: String,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row> {
    Ok(Row {
        id: row.get(0)?,
        document: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn decode(row: Row) -> Result<StoredStore, StoreError> {
    let config: StoreConfig =
        serde_json::from_str(&row.document).map_err(|source| StoreError::Corrupt {
            id: row.id,
            source,
        })?;
    Ok(StoredStore {
        config,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
