//! The canonical listing record and the bounded scrape history.

use crate::text::collapse_whitespace;
use crate::types::{SiteId, Timestamp, Vin};
use serde::{Deserialize, Serialize};

/// Maximum number of records the history retains.
pub const HISTORY_CAP: usize = 20;

/// Maximum number of image URLs a record carries.
pub const MAX_IMAGES: usize = 20;

/// The normalized data extracted from one vehicle listing page.
///
/// Every field degrades independently: a miss is `None` or an empty
/// string, never an error. The `url` is the natural dedup key within
/// [`VehicleHistory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Identifier of the site adapter that produced this record
    pub source: SiteId,
    /// Canonical page URL; uniquely identifies the record in history
    pub url: String,
    /// Raw page title as displayed
    pub title: String,
    /// Model year
    pub year: Option<u16>,
    /// Manufacturer name
    pub make: String,
    /// Model name
    pub model: String,
    /// Trim level (remaining title tokens)
    pub trim: String,
    /// Asking price in whole currency units
    pub price: Option<u32>,
    /// Odometer reading
    pub mileage: Option<u32>,
    /// Vehicle identification number, format-validated
    pub vin: Option<Vin>,
    /// Exterior color, canonicalized to the fixed palette
    pub exterior_color: Option<String>,
    /// Interior color, canonicalized to the fixed palette
    pub interior_color: Option<String>,
    /// Drivetrain description (AWD, FWD, ...)
    pub drivetrain: String,
    /// Transmission description
    pub transmission: String,
    /// Engine description
    pub engine: String,
    /// Fuel type or efficiency text as found on the page
    pub fuel: String,
    /// Absolute http(s) photo URLs, deduplicated, at most [`MAX_IMAGES`]
    pub images: Vec<String>,
    /// Free-text description from the listing
    pub description: String,
    /// LLM-generated description, once enriched
    pub ai_description: Option<String>,
    /// Name of the model that generated `ai_description`
    pub ai_model: Option<String>,
    /// When this record was scraped
    pub scraped_at: Timestamp,
}

impl ListingRecord {
    /// Create an empty record for a page, with every field at its
    /// "unknown" representation.
    #[must_use]
    pub fn new(source: SiteId, url: impl Into<String>) -> Self {
        Self {
            source,
            url: url.into(),
            title: String::new(),
            year: None,
            make: String::new(),
            model: String::new(),
            trim: String::new(),
            price: None,
            mileage: None,
            vin: None,
            exterior_color: None,
            interior_color: None,
            drivetrain: String::new(),
            transmission: String::new(),
            engine: String::new(),
            fuel: String::new(),
            images: Vec::new(),
            description: String::new(),
            ai_description: None,
            ai_model: None,
            scraped_at: Timestamp::now(),
        }
    }

    /// Compose "year make model trim" from the parsed parts, skipping
    /// whatever is unknown.
    #[must_use]
    pub fn composed_title(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        for s in [&self.make, &self.model, &self.trim] {
            if !s.is_empty() {
                parts.push(s.clone());
            }
        }
        collapse_whitespace(&parts.join(" "))
    }

    /// The title to display: the page title when present, otherwise the
    /// composed form.
    #[must_use]
    pub fn display_title(&self) -> String {
        if self.title.is_empty() {
            self.composed_title()
        } else {
            self.title.clone()
        }
    }
}

/// Outcome of a history insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing record with the same URL was updated in place
    Updated,
    /// A new record was prepended
    Inserted {
        /// Whether the oldest record was evicted to stay under the cap
        evicted: bool,
    },
}

/// Bounded most-recent-first collection of listing records.
///
/// Insertion of a new URL prepends; insertion of a known URL merges into
/// the existing entry in place (keeping its position). The collection
/// never exceeds [`HISTORY_CAP`] entries; the oldest is evicted first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleHistory {
    records: Vec<ListingRecord>,
}

impl VehicleHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from existing records, truncating past the cap.
    #[must_use]
    pub fn from_records(mut records: Vec<ListingRecord>) -> Self {
        records.truncate(HISTORY_CAP);
        Self { records }
    }

    /// Insert or update a record, matching by URL.
    ///
    /// On update the incoming record wins field-by-field, except that an
    /// existing AI description survives when the incoming record has
    /// none (re-scans do not regenerate it).
    pub fn upsert(&mut self, mut record: ListingRecord) -> UpsertOutcome {
        record.scraped_at = Timestamp::now();

        if let Some(existing) = self.records.iter_mut().find(|r| r.url == record.url) {
            if record.ai_description.is_none() {
                record.ai_description = existing.ai_description.take();
                record.ai_model = existing.ai_model.take();
            }
            *existing = record;
            return UpsertOutcome::Updated;
        }

        self.records.insert(0, record);
        let evicted = self.records.len() > HISTORY_CAP;
        self.records.truncate(HISTORY_CAP);
        UpsertOutcome::Inserted { evicted }
    }

    /// Look up a record by its URL.
    #[must_use]
    pub fn find_by_url(&self, url: &str) -> Option<&ListingRecord> {
        self.records.iter().find(|r| r.url == url)
    }

    /// Attach an AI description to the record with the given URL.
    ///
    /// Returns `false` when no record matches.
    pub fn set_ai_description(
        &mut self,
        url: &str,
        description: impl Into<String>,
        model: impl Into<String>,
    ) -> bool {
        match self.records.iter_mut().find(|r| r.url == url) {
            Some(record) => {
                record.ai_description = Some(description.into());
                record.ai_model = Some(model.into());
                true
            }
            None => false,
        }
    }

    /// The records, most recent first.
    #[must_use]
    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str) -> ListingRecord {
        let site = SiteId::new("cars-com").expect("valid site ID");
        let mut r = ListingRecord::new(site, url);
        r.year = Some(2018);
        r.make = "Chevrolet".to_string();
        r.model = "Equinox".to_string();
        r.trim = "Premier".to_string();
        r
    }

    #[test]
    fn test_composed_title() {
        let r = record("https://example.com/listing/1");
        assert_eq!(r.composed_title(), "2018 Chevrolet Equinox Premier");
    }

    #[test]
    fn test_composed_title_skips_unknowns() {
        let site = SiteId::new("cars-com").expect("valid site ID");
        let mut r = ListingRecord::new(site, "https://example.com/x");
        r.make = "Toyota".to_string();
        r.model = "Camry".to_string();
        assert_eq!(r.composed_title(), "Toyota Camry");
    }

    #[test]
    fn test_upsert_inserts_at_front() {
        let mut history = VehicleHistory::new();
        history.upsert(record("https://example.com/a"));
        history.upsert(record("https://example.com/b"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.records()[0].url, "https://example.com/b");
        assert_eq!(history.records()[1].url, "https://example.com/a");
    }

    #[test]
    fn test_upsert_is_idempotent_by_url() {
        let mut history = VehicleHistory::new();
        history.upsert(record("https://example.com/a"));

        let mut updated = record("https://example.com/a");
        updated.price = Some(23_991);
        let outcome = history.upsert(updated);

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].price, Some(23_991));
    }

    #[test]
    fn test_upsert_preserves_position_on_update() {
        let mut history = VehicleHistory::new();
        history.upsert(record("https://example.com/a"));
        history.upsert(record("https://example.com/b"));

        history.upsert(record("https://example.com/a"));
        // Updated in place, not moved to the front
        assert_eq!(history.records()[0].url, "https://example.com/b");
        assert_eq!(history.records()[1].url, "https://example.com/a");
    }

    #[test]
    fn test_upsert_keeps_ai_description_on_rescan() {
        let mut history = VehicleHistory::new();
        history.upsert(record("https://example.com/a"));
        assert!(history.set_ai_description("https://example.com/a", "Great car!", "llama3.2:3b"));

        history.upsert(record("https://example.com/a"));
        let kept = history.find_by_url("https://example.com/a").expect("record exists");
        assert_eq!(kept.ai_description.as_deref(), Some("Great car!"));
        assert_eq!(kept.ai_model.as_deref(), Some("llama3.2:3b"));
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut history = VehicleHistory::new();
        for i in 0..HISTORY_CAP {
            history.upsert(record(&format!("https://example.com/{i}")));
        }
        assert_eq!(history.len(), HISTORY_CAP);

        let outcome = history.upsert(record("https://example.com/one-more"));
        assert_eq!(outcome, UpsertOutcome::Inserted { evicted: true });
        assert_eq!(history.len(), HISTORY_CAP);
        // The first record inserted is the one that fell off
        assert!(history.find_by_url("https://example.com/0").is_none());
        assert!(history.find_by_url("https://example.com/one-more").is_some());
    }

    #[test]
    fn test_set_ai_description_unknown_url() {
        let mut history = VehicleHistory::new();
        assert!(!history.set_ai_description("https://example.com/nope", "text", "model"));
    }
}
