//! Asking-price extraction.
//!
//! A labeled pass looks near configured price labels ("Sale Price") and
//! trusts the first dollar amount beside one. Without labels, or when the
//! labeled pass misses, a bounded page scan collects every dollar amount
//! in the first few hundred headline elements and keeps the largest one
//! inside a plausibility window, which steps over monthly-payment teasers
//! and doc fees.

use crate::extraction::Extraction;
use crate::scope::{collapsed_text, is_visible, PageScope};
use regex::Regex;
use scraper::Selector;
use std::sync::OnceLock;

/// Dollar amounts below this read as payments or fees, not prices.
const MIN_PLAUSIBLE: u32 = 500;
/// Dollar amounts above this read as stock numbers or page noise.
const MAX_PLAUSIBLE: u32 = 250_000;
/// Page-scan cutoff. Prices live above the fold.
const SCAN_LIMIT: usize = 300;

fn labeled_money() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\s*(\d{1,3}(?:,\d{3})+|\d{4,6})").expect("valid regex"))
}

fn any_money() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\s*([0-9][0-9,]{2,})").expect("valid regex"))
}

fn scan_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("h1, h2, h3, div, span").expect("valid selector"))
}

/// Extract the asking price in whole dollars.
#[must_use]
pub fn extract_price(scope: &PageScope, labels: &[String]) -> Extraction<u32> {
    for label in labels {
        if let Extraction::Found(price) = labeled_price(scope, label) {
            return Extraction::Found(price);
        }
    }
    scanned_price(scope)
}

/// First dollar amount inside the tightest element naming the label.
fn labeled_price(scope: &PageScope, label: &str) -> Extraction<u32> {
    let escaped = label
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*");
    let pattern = Regex::new(&format!(r"(?i)\b{escaped}\b")).expect("valid regex");

    let candidate = scope
        .visible_elements()
        .map(collapsed_text)
        .filter(|text| pattern.is_match(text) && labeled_money().is_match(text))
        .min_by_key(|text| text.len());
    let Some(text) = candidate else {
        return Extraction::NotFound;
    };
    labeled_money()
        .captures(&text)
        .and_then(|captures| parse_amount(&captures[1]))
        .into()
}

/// Largest plausible dollar amount in the first headline elements.
fn scanned_price(scope: &PageScope) -> Extraction<u32> {
    let best = scope
        .document()
        .select(scan_selector())
        .filter(is_visible)
        .take(SCAN_LIMIT)
        .flat_map(|el| {
            let text = collapsed_text(el);
            any_money()
                .captures_iter(&text)
                .filter_map(|captures| parse_amount(&captures[1]))
                .collect::<Vec<u32>>()
        })
        .filter(|amount| (MIN_PLAUSIBLE..=MAX_PLAUSIBLE).contains(amount))
        .max();
    best.into()
}

fn parse_amount(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse().ok()
}
