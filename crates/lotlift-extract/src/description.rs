//! Dealer-comment extraction.
//!
//! Prefers the paragraphs under a comments heading ("Dealer Comments"),
//! falling back to the page's meta description.

use crate::extraction::Extraction;
use crate::scope::{collapsed_text, is_visible, PageScope};
use scraper::Selector;
use std::sync::OnceLock;

fn paragraph_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("p").expect("valid selector"))
}

/// Extract the dealer's free-form comments for a listing.
#[must_use]
pub fn extract_description(scope: &PageScope, headings: &[String]) -> Extraction<String> {
    if let Some(container) = scope.find_section(headings) {
        let paragraphs: Vec<String> = container
            .select(paragraph_selector())
            .filter(is_visible)
            .map(collapsed_text)
            .filter(|text| !text.is_empty())
            .collect();
        if !paragraphs.is_empty() {
            return Extraction::Found(paragraphs.join("\n\n"));
        }
    }
    scope.meta_description().into()
}
