//! Record assembly: one page snapshot plus one site definition in, one
//! [`ListingRecord`] out.
//!
//! Identity fields (year, make, model, trim) resolve in priority order:
//! a preview card when the site has one, then labeled spec rows, then
//! words of the page title. Every field degrades independently; a page
//! with nothing but a title still produces a usable record.

use crate::cascade::{structured_value, Cascade};
use crate::description::extract_description;
use crate::extraction::Extraction;
use crate::price::extract_price;
use crate::scope::{collapsed_text, PageScope};
use crate::title::parse_title;
use crate::vin::extract_vin;
use lotlift_core::color::canonicalize_color;
use lotlift_core::text::parse_number;
use lotlift_core::{ListingRecord, Vin};
use lotlift_site::{FieldKey, SiteDefinition};
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;
use tracing::debug;

const YEAR_MIN: u16 = 1900;
const YEAR_MAX: u16 = 2100;

fn h1_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("h1").expect("valid selector"))
}

fn title_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("title").expect("valid selector"))
}

/// Builds [`ListingRecord`]s for one site.
pub struct RecordBuilder<'a> {
    definition: &'a SiteDefinition,
}

impl<'a> RecordBuilder<'a> {
    /// Create a builder bound to a site definition.
    #[must_use]
    pub fn new(definition: &'a SiteDefinition) -> Self {
        Self { definition }
    }

    /// Extract a record from a page snapshot.
    #[must_use]
    pub fn build(&self, url: &str, html: &str) -> ListingRecord {
        let scope = PageScope::new(html);
        self.build_from_scope(url, &scope)
    }

    /// Extract a record from an already parsed page.
    #[must_use]
    pub fn build_from_scope(&self, url: &str, scope: &PageScope) -> ListingRecord {
        let rules = &self.definition.extract;
        let mut record = ListingRecord::new(self.definition.id().clone(), url);
        record.title = page_title(scope).unwrap_or_default();

        let section = scope.find_section(&rules.section_headings);
        if section.is_none() && !rules.section_headings.is_empty() {
            debug!("no spec section found on {url}");
        }
        let cascade = Cascade::new(scope, section, &rules.known_labels);
        let preview = if rules.preview_headings.is_empty() {
            None
        } else {
            scope.find_preview(&rules.preview_headings)
        };

        record.year = self
            .field(preview, &cascade, FieldKey::Year)
            .into_option()
            .and_then(|text| parse_number(&text))
            .and_then(|n| u16::try_from(n).ok())
            .filter(|year| (YEAR_MIN..=YEAR_MAX).contains(year));
        record.make = self
            .field(preview, &cascade, FieldKey::Make)
            .unwrap_or_default();
        record.model = self
            .field(preview, &cascade, FieldKey::Model)
            .unwrap_or_default();
        record.trim = self
            .field(preview, &cascade, FieldKey::Trim)
            .unwrap_or_default();

        let parsed = parse_title(&record.title);
        if record.year.is_none() {
            record.year = parsed.year;
        }
        if record.make.is_empty() {
            record.make = parsed.make.unwrap_or_default();
        }
        if record.model.is_empty() {
            record.model = parsed.model.unwrap_or_default();
        }
        if record.trim.is_empty() {
            record.trim = parsed.trim.unwrap_or_default();
        }

        record.mileage = self
            .field(preview, &cascade, FieldKey::Mileage)
            .into_option()
            .and_then(|text| parse_number(&text));
        record.vin = self
            .field(preview, &cascade, FieldKey::Vin)
            .into_option()
            .and_then(|text| Vin::find_in(&text))
            .or_else(|| extract_vin(scope).into_option());
        record.exterior_color = self
            .field(preview, &cascade, FieldKey::ExteriorColor)
            .into_option()
            .and_then(|raw| canonicalize_color(&raw));
        record.interior_color = self
            .field(preview, &cascade, FieldKey::InteriorColor)
            .into_option()
            .and_then(|raw| canonicalize_color(&raw));
        record.drivetrain = self
            .field(preview, &cascade, FieldKey::Drivetrain)
            .unwrap_or_default();
        record.transmission = self
            .field(preview, &cascade, FieldKey::Transmission)
            .unwrap_or_default();
        record.engine = self
            .field(preview, &cascade, FieldKey::Engine)
            .unwrap_or_default();
        record.fuel = self
            .field(preview, &cascade, FieldKey::Fuel)
            .unwrap_or_default();

        record.price = extract_price(scope, &rules.price_labels).into_option();
        record.description =
            extract_description(scope, &rules.description_headings).unwrap_or_default();

        debug!(
            "extracted {} from {url} (vin: {})",
            record.display_title(),
            record.vin.as_ref().map_or("none", Vin::as_str),
        );
        record
    }

    /// One field through the full priority chain.
    fn field(
        &self,
        preview: Option<ElementRef<'_>>,
        cascade: &Cascade<'_>,
        key: FieldKey,
    ) -> Extraction<String> {
        let labels = self.definition.labels_for(key);
        if let Some(card) = preview {
            for label in labels {
                if let Extraction::Found(value) = structured_value(card, label, key.is_numeric()) {
                    return Extraction::Found(value);
                }
            }
        }
        if labels.is_empty() {
            return Extraction::NotFound;
        }
        cascade.value_for(labels, key.is_numeric())
    }
}

fn page_title(scope: &PageScope) -> Option<String> {
    let from_h1 = scope
        .select_visible(h1_selector())
        .map(collapsed_text)
        .find(|text| !text.is_empty());
    from_h1.or_else(|| {
        scope
            .document()
            .select(title_selector())
            .next()
            .map(collapsed_text)
            .filter(|text| !text.is_empty())
    })
}
