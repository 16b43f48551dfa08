//! Persistence layer for Lotlift.
//!
//! Embedded SQLite via `SQLx` with compile-time embedded migrations.
//! Holds the key-value settings store and the bounded listing history.

pub mod connection;
pub mod error;
pub mod history;
pub mod migrations;
pub mod settings;

pub use error::{Result, StoreError};

use lotlift_core::{ListingRecord, UpsertOutcome, VehicleHistory};
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// High-level store interface that owns the pool and runs migrations.
#[derive(Debug)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Open the database at `path`, creating parent directories and the
    /// file as needed, and bring the schema up to date.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let pool = connection::open_pool(path).await?;
        migrations::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database with the schema applied.
    pub async fn in_memory() -> Result<Self> {
        let pool = connection::open_pool(":memory:").await?;
        migrations::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying pool, for direct queries.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Insert or update a listing, matching by URL.
    pub async fn upsert_listing(&self, record: &ListingRecord) -> Result<UpsertOutcome> {
        history::upsert_listing(&self.pool, record).await
    }

    /// Look up a listing by its URL.
    pub async fn find_listing(&self, url: &str) -> Result<Option<ListingRecord>> {
        history::find_listing(&self.pool, url).await
    }

    /// Load the whole history, most recent first.
    pub async fn history(&self) -> Result<VehicleHistory> {
        history::all_listings(&self.pool).await
    }

    /// Attach an AI description to the listing with the given URL.
    pub async fn set_ai_description(
        &self,
        url: &str,
        description: &str,
        model: &str,
    ) -> Result<bool> {
        history::set_ai_description(&self.pool, url, description, model).await
    }

    /// Close the pool gracefully.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
