//! Inference of marketplace-facing vehicle attributes.
//!
//! Listing pages rarely state body style or fuel type in the exact
//! vocabulary a marketplace form expects, so these helpers derive the
//! closest canonical value from whatever text the record carries. Each
//! table is ordered and the first match wins.

use crate::record::ListingRecord;
use crate::text::collapse_whitespace;
use regex::Regex;
use std::sync::OnceLock;

fn compile(rules: &[(&'static str, &'static str)]) -> Vec<(Regex, &'static str)> {
    rules
        .iter()
        .map(|(pattern, label)| (Regex::new(pattern).expect("valid regex"), *label))
        .collect()
}

static BODY_STYLE_RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();

fn body_style_rules() -> &'static [(Regex, &'static str)] {
    BODY_STYLE_RULES.get_or_init(|| {
        compile(&[
            (r"truck|pickup|f-?150|silverado|ram|tundra|sierra|tacoma", "Truck"),
            (
                r"van|minivan|transit|sienna|odyssey|caravan|pacifica|sprinter|promaster",
                "Van",
            ),
            (r"coupe|mustang|challenger|camaro|brz|86|supra", "Coupe"),
            (r"convertible|roadster|spider|spyder|cabrio", "Convertible"),
            (r"hatch|golf|fit|yaris|versa", "Hatchback"),
            (r"wagon|outback|allroad", "Wagon"),
            (
                r"suv|trailblazer|equinox|tahoe|suburban|escape|rav4|cr-?v|pilot|highlander|explorer|blazer|cx-|nx|rx|gv|x[3-7]|gl|telluride|seltos|palisade",
                "SUV",
            ),
        ])
    })
}

/// Derive the marketplace body style from make, model, and trim.
///
/// Falls back to `"Saloon"` when nothing in the name gives the body
/// away.
#[must_use]
pub fn infer_body_style(record: &ListingRecord) -> &'static str {
    let haystack = format!("{} {} {}", record.make, record.model, record.trim).to_lowercase();
    for (pattern, label) in body_style_rules() {
        if pattern.is_match(&haystack) {
            return label;
        }
    }
    "Saloon"
}

static FUEL_FIELD_RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
static FUEL_ELECTRIC: OnceLock<Regex> = OnceLock::new();
static FUEL_NOT_ELECTRIC: OnceLock<Regex> = OnceLock::new();
static FUEL_HYBRID: OnceLock<Regex> = OnceLock::new();
static FUEL_DIESEL: OnceLock<Regex> = OnceLock::new();

/// Derive the marketplace fuel type.
///
/// The explicit fuel field wins when it names a type. Otherwise the
/// engine and description text are searched for electric, hybrid, and
/// diesel markers, defaulting to `"Petrol"`.
#[must_use]
pub fn infer_fuel(record: &ListingRecord) -> &'static str {
    let field = record.fuel.to_lowercase();
    if !field.is_empty() {
        let rules = FUEL_FIELD_RULES.get_or_init(|| {
            compile(&[
                (r"gasoline|petrol|gas|regular", "Petrol"),
                (r"electric|ev", "Electric"),
                (r"hybrid", "Hybrid"),
                (r"diesel", "Diesel"),
            ])
        });
        for (pattern, label) in rules {
            if pattern.is_match(&field) {
                return label;
            }
        }
    }

    let text = format!("{} {}", record.engine, record.description).to_lowercase();
    let electric = FUEL_ELECTRIC
        .get_or_init(|| Regex::new(r"\belectric\b|\bev\b|kilowatt|kwh|battery").expect("valid regex"));
    let not_electric = FUEL_NOT_ELECTRIC
        .get_or_init(|| Regex::new(r"gasoline|petrol|regular").expect("valid regex"));
    if electric.is_match(&text) && !not_electric.is_match(&text) {
        return "Electric";
    }
    let hybrid =
        FUEL_HYBRID.get_or_init(|| Regex::new(r"hybrid|hev|plugin|plug-in|phev").expect("valid regex"));
    if hybrid.is_match(&text) {
        return "Hybrid";
    }
    let diesel =
        FUEL_DIESEL.get_or_init(|| Regex::new(r"diesel|tdi|duramax|cummins").expect("valid regex"));
    if diesel.is_match(&text) {
        return "Diesel";
    }
    "Petrol"
}

static TRANSMISSION_MANUAL: OnceLock<Regex> = OnceLock::new();

/// Derive the marketplace transmission label.
#[must_use]
pub fn infer_transmission(record: &ListingRecord) -> &'static str {
    let text = record.transmission.to_lowercase();
    let manual =
        TRANSMISSION_MANUAL.get_or_init(|| Regex::new(r"manual|\bmt\b").expect("valid regex"));
    if manual.is_match(&text) {
        return "Manual transmission";
    }
    if text.contains("cvt") {
        return "CVT";
    }
    "Automatic transmission"
}

/// The marketplace condition label for a used listing.
///
/// Always `"Good"` today; the mileage is accepted so the policy can
/// become mileage-sensitive without touching callers.
#[must_use]
pub fn condition_label(_mileage: Option<u32>) -> &'static str {
    "Good"
}

/// Compose a fallback description from the record's parts.
///
/// Used when the listing has no prose of its own and no AI description
/// has been generated.
#[must_use]
pub fn composed_description(record: &ListingRecord) -> String {
    let mut sentences: Vec<String> = Vec::new();
    let title = record.display_title();
    if !title.is_empty() {
        sentences.push(title);
    }
    let driveline = collapse_whitespace(&format!("{} {}", record.drivetrain, record.transmission));
    if !driveline.is_empty() {
        sentences.push(driveline);
    }
    if !record.engine.is_empty() {
        sentences.push(record.engine.clone());
    }
    if let Some(vin) = &record.vin {
        sentences.push(format!("VIN {vin}"));
    }
    let text = sentences
        .iter()
        .map(|s| format!("{}.", s.trim_end_matches('.')))
        .collect::<Vec<_>>()
        .join(" ");
    text.replace("..", ".")
}

/// The description to put on a marketplace form: the AI description
/// when one exists, then the listing's own prose, then the composed
/// fallback.
#[must_use]
pub fn preferred_description(record: &ListingRecord) -> String {
    if let Some(ai) = &record.ai_description {
        if !ai.is_empty() {
            return ai.clone();
        }
    }
    if !record.description.is_empty() {
        return record.description.clone();
    }
    composed_description(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SiteId, Vin};

    fn record() -> ListingRecord {
        let site = SiteId::new("capitol-chevrolet").expect("valid site ID");
        ListingRecord::new(site, "https://example.com/listing")
    }

    #[test]
    fn test_body_style_from_model_name() {
        let mut r = record();
        r.make = "Chevrolet".to_string();
        r.model = "Silverado 1500".to_string();
        assert_eq!(infer_body_style(&r), "Truck");

        r.model = "Equinox".to_string();
        assert_eq!(infer_body_style(&r), "SUV");

        r.model = "Malibu".to_string();
        assert_eq!(infer_body_style(&r), "Saloon");
    }

    #[test]
    fn test_body_style_first_match_wins() {
        let mut r = record();
        r.make = "Ford".to_string();
        r.model = "Transit".to_string();
        r.trim = "Wagon".to_string();
        // Van rule precedes the wagon rule
        assert_eq!(infer_body_style(&r), "Van");
    }

    #[test]
    fn test_fuel_explicit_field_wins() {
        let mut r = record();
        r.fuel = "Gasoline".to_string();
        r.engine = "Electric Motor".to_string();
        assert_eq!(infer_fuel(&r), "Petrol");
    }

    #[test]
    fn test_fuel_from_engine_text() {
        let mut r = record();
        r.engine = "150 kWh battery".to_string();
        assert_eq!(infer_fuel(&r), "Electric");

        r.engine = "6.6L Duramax Turbo-Diesel V8".to_string();
        assert_eq!(infer_fuel(&r), "Diesel");

        r.engine = "2.5L 4-Cylinder Hybrid".to_string();
        assert_eq!(infer_fuel(&r), "Hybrid");
    }

    #[test]
    fn test_fuel_electric_marker_suppressed_by_gasoline() {
        let mut r = record();
        r.engine = "1.5L Turbo Gasoline".to_string();
        r.description = "Battery warranty included".to_string();
        assert_eq!(infer_fuel(&r), "Petrol");
    }

    #[test]
    fn test_fuel_default() {
        let r = record();
        assert_eq!(infer_fuel(&r), "Petrol");
    }

    #[test]
    fn test_transmission_labels() {
        let mut r = record();
        r.transmission = "6-Speed Manual".to_string();
        assert_eq!(infer_transmission(&r), "Manual transmission");

        r.transmission = "CVT".to_string();
        assert_eq!(infer_transmission(&r), "CVT");

        r.transmission = "9-Speed Automatic".to_string();
        assert_eq!(infer_transmission(&r), "Automatic transmission");

        r.transmission = String::new();
        assert_eq!(infer_transmission(&r), "Automatic transmission");
    }

    #[test]
    fn test_condition_is_good() {
        assert_eq!(condition_label(Some(48_254)), "Good");
        assert_eq!(condition_label(None), "Good");
    }

    #[test]
    fn test_composed_description() {
        let mut r = record();
        r.year = Some(2018);
        r.make = "Chevrolet".to_string();
        r.model = "Equinox".to_string();
        r.drivetrain = "AWD".to_string();
        r.transmission = "6-Speed Automatic".to_string();
        r.engine = "1.5L Turbo".to_string();
        r.vin = Vin::new("2GNAXSEV5J6100001").ok();

        assert_eq!(
            composed_description(&r),
            "2018 Chevrolet Equinox. AWD 6-Speed Automatic. 1.5L Turbo. VIN 2GNAXSEV5J6100001."
        );
    }

    #[test]
    fn test_composed_description_skips_missing_parts() {
        let mut r = record();
        r.make = "Honda".to_string();
        r.model = "Civic".to_string();
        assert_eq!(composed_description(&r), "Honda Civic.");
    }

    #[test]
    fn test_preferred_description_order() {
        let mut r = record();
        r.make = "Honda".to_string();
        r.model = "Civic".to_string();

        assert_eq!(preferred_description(&r), "Honda Civic.");

        r.description = "One owner, clean title.".to_string();
        assert_eq!(preferred_description(&r), "One owner, clean title.");

        r.ai_description = Some("A wonderful commuter.".to_string());
        assert_eq!(preferred_description(&r), "A wonderful commuter.");
    }
}
