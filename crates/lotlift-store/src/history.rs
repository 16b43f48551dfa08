//! Listing history storage.
//!
//! One row per listing URL, records serialized as JSON documents. Row ids
//! carry insertion order: a fresh URL gets a new id (and so sorts newest),
//! an update keeps its id and therefore its place in the history. The
//! table never holds more than [`HISTORY_CAP`] rows.

use crate::error::{Result, StoreError};
use lotlift_core::{ListingRecord, Timestamp, UpsertOutcome, VehicleHistory, HISTORY_CAP};
use sqlx::SqlitePool;
use tracing::debug;

/// Insert or update a listing, matching by URL.
///
/// Mirrors [`VehicleHistory::upsert`]: the incoming record wins
/// field-by-field, except that an existing AI description survives when
/// the incoming record has none. Inserting past the cap evicts the
/// oldest rows.
pub async fn upsert_listing(pool: &SqlitePool, record: &ListingRecord) -> Result<UpsertOutcome> {
    let mut record = record.clone();
    record.scraped_at = Timestamp::now();

    let existing: Option<(String,)> = sqlx::query_as("SELECT record FROM listings WHERE url = ?")
        .bind(&record.url)
        .fetch_optional(pool)
        .await?;

    if let Some((json,)) = existing {
        let previous: ListingRecord = decode(&json)?;
        if record.ai_description.is_none() {
            record.ai_description = previous.ai_description;
            record.ai_model = previous.ai_model;
        }

        sqlx::query(
            r"
            UPDATE listings
            SET record = ?, scraped_at = ?, updated_at = datetime('now')
            WHERE url = ?
            ",
        )
        .bind(encode(&record)?)
        .bind(record.scraped_at.to_rfc3339())
        .bind(&record.url)
        .execute(pool)
        .await?;

        debug!(url = %record.url, "updated listing in place");
        return Ok(UpsertOutcome::Updated);
    }

    sqlx::query("INSERT INTO listings (url, record, scraped_at) VALUES (?, ?, ?)")
        .bind(&record.url)
        .bind(encode(&record)?)
        .bind(record.scraped_at.to_rfc3339())
        .execute(pool)
        .await?;

    let evicted = sqlx::query(
        "DELETE FROM listings WHERE id NOT IN (SELECT id FROM listings ORDER BY id DESC LIMIT ?)",
    )
    .bind(HISTORY_CAP as i64)
    .execute(pool)
    .await?
    .rows_affected()
        > 0;

    debug!(url = %record.url, evicted, "inserted listing");
    Ok(UpsertOutcome::Inserted { evicted })
}

/// Look up a listing by its URL.
pub async fn find_listing(pool: &SqlitePool, url: &str) -> Result<Option<ListingRecord>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT record FROM listings WHERE url = ?")
        .bind(url)
        .fetch_optional(pool)
        .await?;

    row.map(|(json,)| decode(&json)).transpose()
}

/// Load the whole history, most recent first.
pub async fn all_listings(pool: &SqlitePool) -> Result<VehicleHistory> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT record FROM listings ORDER BY id DESC")
        .fetch_all(pool)
        .await?;

    let records = rows
        .into_iter()
        .map(|(json,)| decode(&json))
        .collect::<Result<Vec<_>>>()?;

    Ok(VehicleHistory::from_records(records))
}

/// Attach an AI description to the listing with the given URL.
///
/// Returns `false` when no listing matches.
pub async fn set_ai_description(
    pool: &SqlitePool,
    url: &str,
    description: &str,
    model: &str,
) -> Result<bool> {
    let Some(mut record) = find_listing(pool, url).await? else {
        return Ok(false);
    };

    record.ai_description = Some(description.to_string());
    record.ai_model = Some(model.to_string());

    sqlx::query("UPDATE listings SET record = ?, updated_at = datetime('now') WHERE url = ?")
        .bind(encode(&record)?)
        .bind(url)
        .execute(pool)
        .await?;

    Ok(true)
}

fn encode(record: &ListingRecord) -> Result<String> {
    serde_json::to_string(record).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode(json: &str) -> Result<ListingRecord> {
    serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Store;
    use lotlift_core::SiteId;

    fn record(url: &str) -> ListingRecord {
        let site = SiteId::new("capitol-chevrolet").expect("valid site id");
        let mut r = ListingRecord::new(site, url);
        r.year = Some(2018);
        r.make = "Chevrolet".to_string();
        r.model = "Equinox".to_string();
        r
    }

    async fn test_store() -> Store {
        Store::in_memory().await.expect("create test store")
    }

    #[tokio::test]
    async fn test_upsert_inserts_new_listing() {
        let store = test_store().await;
        let pool = store.pool();

        let outcome = upsert_listing(pool, &record("https://example.com/a"))
            .await
            .expect("upsert");
        assert_eq!(outcome, UpsertOutcome::Inserted { evicted: false });

        let found = find_listing(pool, "https://example.com/a")
            .await
            .expect("find listing");
        assert_eq!(found.expect("record present").make, "Chevrolet");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_url() {
        let store = test_store().await;
        let pool = store.pool();

        upsert_listing(pool, &record("https://example.com/a"))
            .await
            .expect("first upsert");

        let mut updated = record("https://example.com/a");
        updated.price = Some(23_991);
        let outcome = upsert_listing(pool, &updated).await.expect("second upsert");
        assert_eq!(outcome, UpsertOutcome::Updated);

        let history = all_listings(pool).await.expect("load history");
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].price, Some(23_991));
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let store = test_store().await;
        let pool = store.pool();

        for url in ["https://example.com/a", "https://example.com/b", "https://example.com/c"] {
            upsert_listing(pool, &record(url)).await.expect("upsert");
        }

        // Re-scanning the oldest listing must not move it to the front
        upsert_listing(pool, &record("https://example.com/a"))
            .await
            .expect("rescan oldest");

        let history = all_listings(pool).await.expect("load history");
        let urls: Vec<&str> = history.records().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/c",
                "https://example.com/b",
                "https://example.com/a",
            ]
        );
    }

    #[tokio::test]
    async fn test_ai_description_survives_rescan() {
        let store = test_store().await;
        let pool = store.pool();

        upsert_listing(pool, &record("https://example.com/a"))
            .await
            .expect("initial upsert");
        set_ai_description(pool, "https://example.com/a", "A great SUV.", "llama3.1:8b")
            .await
            .expect("set description");

        // Fresh scan carries no AI description
        upsert_listing(pool, &record("https://example.com/a"))
            .await
            .expect("rescan");

        let found = find_listing(pool, "https://example.com/a")
            .await
            .expect("find listing")
            .expect("record present");
        assert_eq!(found.ai_description.as_deref(), Some("A great SUV."));
        assert_eq!(found.ai_model.as_deref(), Some("llama3.1:8b"));
    }

    #[tokio::test]
    async fn test_cap_evicts_oldest() {
        let store = test_store().await;
        let pool = store.pool();

        for i in 0..HISTORY_CAP {
            upsert_listing(pool, &record(&format!("https://example.com/{i}")))
                .await
                .expect("upsert within cap");
        }

        let outcome = upsert_listing(pool, &record("https://example.com/one-too-many"))
            .await
            .expect("upsert past cap");
        assert_eq!(outcome, UpsertOutcome::Inserted { evicted: true });

        let history = all_listings(pool).await.expect("load history");
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.records()[0].url, "https://example.com/one-too-many");
        // The first inserted URL is gone
        assert!(history.find_by_url("https://example.com/0").is_none());
    }

    #[tokio::test]
    async fn test_set_ai_description_unknown_url() {
        let store = test_store().await;

        let updated = set_ai_description(
            store.pool(),
            "https://example.com/nope",
            "Text",
            "llama3.1:8b",
        )
        .await
        .expect("set description");
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_all_listings_most_recent_first() {
        let store = test_store().await;
        let pool = store.pool();

        upsert_listing(pool, &record("https://example.com/first"))
            .await
            .expect("upsert first");
        upsert_listing(pool, &record("https://example.com/second"))
            .await
            .expect("upsert second");

        let history = all_listings(pool).await.expect("load history");
        assert_eq!(history.records()[0].url, "https://example.com/second");
        assert_eq!(history.records()[1].url, "https://example.com/first");
    }
}
