//! Key-value settings storage.
//!
//! Values are stored as JSON, last write wins. The application settings
//! all happen to be strings, so string helpers are provided on top of
//! the raw [`serde_json::Value`] interface.

use crate::error::{Result, StoreError};
use serde_json::Value;
use sqlx::SqlitePool;

/// Settings keys used by the application.
pub mod keys {
    /// URL of the most recently scanned listing
    pub const CURRENT_URL: &str = "current_url";
    /// Base URL of the Ollama server, overriding the configured default
    pub const OLLAMA_URL: &str = "ollama_url";
    /// Instruction template for description generation
    pub const AI_INSTRUCTIONS: &str = "ai_instructions";
    /// Model used for description generation
    pub const SELECTED_MODEL: &str = "selected_model";
}

/// Set a setting, replacing any previous value.
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &Value) -> Result<()> {
    let value_str =
        serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

    sqlx::query(
        r"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        ",
    )
    .bind(key)
    .bind(value_str)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a setting, `None` when the key has never been set.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<Value>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((value_str,)) => {
            let value: Value = serde_json::from_str(&value_str)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Delete a setting.
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Set a string-valued setting.
pub async fn set_string(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    set_setting(pool, key, &Value::String(value.to_string())).await
}

/// Get a string-valued setting, `None` when unset or not a string.
pub async fn get_string(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = get_setting(pool, key).await?;
    Ok(value.and_then(|v| v.as_str().map(String::from)))
}
