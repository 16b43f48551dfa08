//! VIN extraction.
//!
//! Two passes: a `VIN:` label followed by a token anywhere in visible
//! text, then any leaf element whose entire text is one bare token.

use crate::extraction::Extraction;
use crate::scope::{collapsed_text, is_leaf, PageScope};
use lotlift_core::Vin;
use regex::Regex;
use std::sync::OnceLock;

fn labeled_vin() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bVIN\b[:#\s]*([A-HJ-NPR-Z0-9]{17})\b").expect("valid regex"))
}

fn bare_vin() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid regex"))
}

/// Extract the vehicle identification number from a listing page.
#[must_use]
pub fn extract_vin(scope: &PageScope) -> Extraction<Vin> {
    for el in scope.visible_elements() {
        let text = collapsed_text(el).to_ascii_uppercase();
        if let Some(captures) = labeled_vin().captures(&text) {
            if let Ok(vin) = Vin::new(&captures[1]) {
                return Extraction::Found(vin);
            }
        }
    }

    for el in scope.visible_elements() {
        if !is_leaf(el) {
            continue;
        }
        let text = collapsed_text(el).to_ascii_uppercase();
        if bare_vin().is_match(&text) {
            if let Ok(vin) = Vin::new(text) {
                return Extraction::Found(vin);
            }
        }
    }

    Extraction::NotFound
}
