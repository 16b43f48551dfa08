//! Label-to-value resolution over dealer listing markup.
//!
//! Three passes, cheapest and most precise first:
//!
//! 1. Structured: definition lists and label leaves paired with a sibling
//!    value cell inside the details section.
//! 2. Inline: `Label: value` runs of text inside the details section, cut
//!    at the next known label.
//! 3. The inline pass repeated over the whole page.

use crate::extraction::{non_empty, Extraction};
use crate::scope::{collapsed_text, is_leaf, is_visible, own_text, PageScope};
use lotlift_core::text::collapse_whitespace;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::OnceLock;

static DT_SELECTOR: OnceLock<Selector> = OnceLock::new();

/// Resolves field labels to values within one page.
pub struct Cascade<'a> {
    scope: &'a PageScope,
    section: Option<ElementRef<'a>>,
    known_labels: &'a [String],
}

impl<'a> Cascade<'a> {
    /// Build a resolver rooted at an optional spec section. `known_labels`
    /// is the full label vocabulary, used to cut run-on inline values.
    #[must_use]
    pub fn new(
        scope: &'a PageScope,
        section: Option<ElementRef<'a>>,
        known_labels: &'a [String],
    ) -> Self {
        Self {
            scope,
            section,
            known_labels,
        }
    }

    /// Resolve a field, trying each of its labels through every pass.
    #[must_use]
    pub fn value_for(&self, labels: &[String], numeric: bool) -> Extraction<String> {
        if let Some(section) = self.section {
            for label in labels {
                if let Extraction::Found(value) = structured_value(section, label, numeric) {
                    return Extraction::Found(value);
                }
                let in_section = section
                    .descendants()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| is_visible(el));
                if let Extraction::Found(value) = self.inline_value(in_section, label, true) {
                    return Extraction::Found(value);
                }
            }
        }
        // Page-wide pass over running text. Leaves first so values stay
        // tight; containers catch labels split across inline markup.
        for label in labels {
            let leaves = self
                .scope
                .visible_elements()
                .filter(|el| is_leaf(*el));
            if let Extraction::Found(value) = self.inline_value(leaves, label, false) {
                return Extraction::Found(value);
            }
            if let Extraction::Found(value) =
                self.inline_value(self.scope.visible_elements(), label, false)
            {
                return Extraction::Found(value);
            }
        }
        Extraction::NotFound
    }

    /// `Label: value` match over candidate elements, value cut at the
    /// first other known label. Anchored matches require the element text
    /// to start with the label.
    fn inline_value<I>(&self, elements: I, label: &str, anchored: bool) -> Extraction<String>
    where
        I: Iterator<Item = ElementRef<'a>>,
    {
        let pattern = inline_pattern(label, anchored);
        for el in elements {
            let text = collapsed_text(el);
            let Some(captures) = pattern.captures(&text) else {
                continue;
            };
            let mut value = captures[1].to_string();
            if let Some(cut) = self.label_cut_pattern(label) {
                value = cut.replace(&value, "").to_string();
            }
            if let Extraction::Found(value) = non_empty(collapse_whitespace(&value)) {
                return Extraction::Found(value);
            }
        }
        Extraction::NotFound
    }

    fn label_cut_pattern(&self, current: &str) -> Option<Regex> {
        let others: Vec<String> = self
            .known_labels
            .iter()
            .filter(|label| !label.eq_ignore_ascii_case(current))
            .map(|label| regex::escape(label))
            .collect();
        if others.is_empty() {
            return None;
        }
        let pattern = format!(r"(?i)\s+(?:{}):.*$", others.join("|"));
        Some(Regex::new(&pattern).expect("valid regex"))
    }
}

/// Structured pass over one container: definition lists first, then label
/// leaves resolved against their surrounding markup.
#[must_use]
pub fn structured_value(container: ElementRef, label: &str, numeric: bool) -> Extraction<String> {
    let target = normalize_label(label);

    let dt = DT_SELECTOR.get_or_init(|| Selector::parse("dt").expect("valid selector"));
    for term in container.select(dt) {
        if !is_visible(&term) || normalize_label(&collapsed_text(term)) != target {
            continue;
        }
        let value = term
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "dd");
        if let Some(dd) = value {
            if let Extraction::Found(text) = value_text(dd, numeric) {
                return Extraction::Found(text);
            }
        }
    }

    for el in container.descendants().filter_map(ElementRef::wrap) {
        if !is_visible(&el) || !is_leaf(el) {
            continue;
        }
        if normalize_label(&collapsed_text(el)) != target {
            continue;
        }
        if let Extraction::Found(value) = resolve_label_leaf(el, numeric) {
            return Extraction::Found(value);
        }
    }

    Extraction::NotFound
}

/// Value lookup around a leaf that holds exactly the label text.
fn resolve_label_leaf(label: ElementRef, numeric: bool) -> Extraction<String> {
    let label_text = collapsed_text(label);

    if let Some(parent) = label.parent().and_then(ElementRef::wrap) {
        // Table rows pair the label with the last cell.
        if parent.value().name() == "tr" {
            let cell = parent
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|el| matches!(el.value().name(), "td" | "th"))
                .filter(|el| el.id() != label.id())
                .last();
            if let Some(cell) = cell {
                if let Extraction::Found(value) = value_text(cell, numeric) {
                    return Extraction::Found(value);
                }
            }
        }

        let siblings: Vec<ElementRef> = parent
            .children()
            .filter_map(ElementRef::wrap)
            .collect();
        if siblings.len() >= 2 {
            // The cell after the label, else any other cell.
            let after = label
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .next();
            let other = after.or_else(|| {
                siblings
                    .iter()
                    .copied()
                    .find(|el| el.id() != label.id())
            });
            if let Some(value) = other {
                if let Extraction::Found(text) = value_text(value, numeric) {
                    if text != label_text {
                        return Extraction::Found(text);
                    }
                }
            }
        }
    }

    // Last resort: the next sibling with any text of its own.
    for sibling in label.next_siblings().filter_map(ElementRef::wrap) {
        if let Extraction::Found(text) = value_text(sibling, numeric) {
            if text != label_text {
                return Extraction::Found(text);
            }
        }
    }

    Extraction::NotFound
}

/// Text of a value element. Numeric fields read the element's direct text
/// first so unit suffixes in nested spans do not pollute the number.
fn value_text(el: ElementRef, numeric: bool) -> Extraction<String> {
    if numeric {
        let direct = own_text(el);
        if direct.chars().any(|c| c.is_ascii_digit()) {
            return Extraction::Found(direct);
        }
    }
    non_empty(collapsed_text(el))
}

/// Lowercased label with any trailing colon removed.
fn normalize_label(text: &str) -> String {
    collapse_whitespace(text)
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
}

fn inline_pattern(label: &str, anchored: bool) -> Regex {
    let escaped = regex::escape(label);
    let pattern = if anchored {
        format!(r"(?i)^{escaped}\s*:\s*(.+)$")
    } else {
        format!(r"(?i)\b{escaped}\s*:\s*(.+)$")
    };
    Regex::new(&pattern).expect("valid regex")
}
