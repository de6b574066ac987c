//! # eb-db-sqlite Implementation
//!
//! SQLite implementation of the eb-core persistence ports, including the
//! counter store. All multi-row writes (comment create + counter bump, like
//! toggles, soft-delete cascades) run inside a single transaction so the
//! denormalized counters can never drift from the rows they cache.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

pub mod counters;

mod comments;
mod likes;
mod posts;

// Helpers for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

/// Shared SQLite store implementing `PostRepo`, `CommentRepo`, and
/// `LikeRepo` over one connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies the
    /// embedded schema.
    pub async fn new(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.apply_schema().await?;
        Ok(store)
    }

    /// A private in-memory database on a single connection. Used by tests;
    /// more than one connection would see more than one database.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::new("sqlite::memory:", 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply_schema(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(include_str!("schema.sql"))
            .execute(&self.pool)
            .await?;
        tracing::debug!("schema applied");
        Ok(())
    }
}
