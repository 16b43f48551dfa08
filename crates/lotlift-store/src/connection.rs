//! Database connection management.

use crate::error::{Result, StoreError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// Open a connection pool for the database at `path`.
///
/// Creates the file if it does not exist; `:memory:` gives an in-memory
/// database. WAL journaling keeps readers unblocked during writes.
pub async fn open_pool(path: impl AsRef<Path>) -> Result<Pool<Sqlite>> {
    let path_str = path
        .as_ref()
        .to_str()
        .ok_or_else(|| StoreError::Open("invalid database path: not valid UTF-8".to_string()))?;

    let connect_options = SqliteConnectOptions::from_str(path_str)
        .map_err(|e| StoreError::Open(format!("invalid connection string: {e}")))?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await
        .map_err(|e| StoreError::Open(format!("failed to open connection pool: {e}")))?;

    tracing::debug!("Database pool created at {}", path_str);

    Ok(pool)
}
