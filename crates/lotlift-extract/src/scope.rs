//! Visibility-aware views over a parsed listing page.
//!
//! Listing pages carry sizeable invisible regions (lazy-load templates,
//! mobile/desktop duplicates, overlay chrome). Extraction only trusts text a
//! person could actually see, approximated statically: anything nested under
//! `script`/`style`/`noscript`/`template`, a `hidden`/`aria-hidden` element,
//! or an inline `display:none`/`visibility:hidden` style is out of scope.

use lotlift_core::text::collapse_whitespace;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

static HEADING_SELECTOR: OnceLock<Selector> = OnceLock::new();
static PREVIEW_HEADING_SELECTOR: OnceLock<Selector> = OnceLock::new();
static MAIN_SELECTORS: OnceLock<Vec<Selector>> = OnceLock::new();
static META_DESCRIPTION: OnceLock<Selector> = OnceLock::new();

/// A parsed page with visibility-aware accessors.
pub struct PageScope {
    document: Html,
}

impl PageScope {
    /// Parse a page snapshot.
    #[must_use]
    pub fn new(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// The underlying parsed document.
    #[must_use]
    pub fn document(&self) -> &Html {
        &self.document
    }

    /// All visible elements in document order.
    pub fn visible_elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(is_visible)
    }

    /// Visible elements matched by a selector.
    pub fn select_visible<'a>(
        &'a self,
        sel: &'a Selector,
    ) -> impl Iterator<Item = ElementRef<'a>> {
        self.document.select(sel).filter(is_visible)
    }

    /// The page's main content region: `main`, `article`, `[role="main"]`,
    /// `.container`, falling back to the whole document.
    #[must_use]
    pub fn main_content(&self) -> ElementRef<'_> {
        let candidates = MAIN_SELECTORS.get_or_init(|| {
            ["main", "article", "[role=\"main\"]", ".container"]
                .iter()
                .map(|s| selector(s))
                .collect()
        });
        for sel in candidates {
            if let Some(el) = self.document.select(sel).find(is_visible) {
                return el;
            }
        }
        self.document.root_element()
    }

    /// Find the container of the first visible `h1`-`h4` heading matching
    /// one of the configured heading phrases, trying phrases in order.
    #[must_use]
    pub fn find_section(&self, headings: &[String]) -> Option<ElementRef<'_>> {
        let sel = HEADING_SELECTOR.get_or_init(|| selector("h1, h2, h3, h4"));
        for heading in headings {
            let pattern = heading_pattern(heading);
            let found = self
                .select_visible(sel)
                .find(|el| pattern.is_match(&collapsed_text(*el)));
            if let Some(el) = found {
                return Some(section_container(el));
            }
        }
        None
    }

    /// Whether any visible `h1`-`h4` heading matches one of the phrases.
    /// Used to decide that lazily rendered sections have mounted.
    #[must_use]
    pub fn has_any_heading(&self, headings: &[String]) -> bool {
        let sel = HEADING_SELECTOR.get_or_init(|| selector("h1, h2, h3, h4"));
        headings.iter().any(|heading| {
            let pattern = heading_pattern(heading);
            self.select_visible(sel)
                .any(|el| pattern.is_match(&collapsed_text(el)))
        })
    }

    /// Find a summary card near a heading phrase (e.g. "Vehicle preview"):
    /// climbs a few ancestors from the heading until a container holding
    /// year/make/model/trim rows appears.
    #[must_use]
    pub fn find_preview(&self, headings: &[String]) -> Option<ElementRef<'_>> {
        static ROW_PROBE: OnceLock<Regex> = OnceLock::new();
        let probe = ROW_PROBE
            .get_or_init(|| Regex::new(r"(?i)\b(year|make|model|trim)\b").expect("valid regex"));
        let sel =
            PREVIEW_HEADING_SELECTOR.get_or_init(|| selector("h2, h3, div, span"));

        for heading in headings {
            let pattern = heading_pattern(heading);
            // Wrapper divs match the phrase too; the tightest match (shortest
            // text) is the heading element itself.
            let label = self
                .select_visible(sel)
                .filter(|el| pattern.is_match(&collapsed_text(*el)))
                .min_by_key(|el| collapsed_text(*el).len());
            let Some(label) = label else { continue };

            let start = label
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "div")
                .and_then(|div| div.parent().and_then(ElementRef::wrap))
                .or_else(|| label.parent().and_then(ElementRef::wrap));

            let mut current = start;
            for _ in 0..4 {
                let Some(candidate) = current else { break };
                if probe.is_match(&collapsed_text(candidate)) {
                    return Some(candidate);
                }
                current = candidate.parent().and_then(ElementRef::wrap);
            }
        }
        None
    }

    /// The `meta[name="description"]` content, collapsed.
    #[must_use]
    pub fn meta_description(&self) -> Option<String> {
        let sel = META_DESCRIPTION.get_or_init(|| selector("meta[name=\"description\"]"));
        self.document
            .select(sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(collapse_whitespace)
            .filter(|s| !s.is_empty())
    }
}

/// Whether an element (and every ancestor) would render.
#[must_use]
pub fn is_visible(el: &ElementRef) -> bool {
    element_renders(el)
        && el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .all(|ancestor| element_renders(&ancestor))
}

fn element_renders(el: &ElementRef) -> bool {
    let value = el.value();
    if matches!(
        value.name(),
        "script" | "style" | "noscript" | "template" | "head"
    ) {
        return false;
    }
    if value.attr("hidden").is_some() {
        return false;
    }
    if value.attr("aria-hidden") == Some("true") {
        return false;
    }
    if let Some(style) = value.attr("style") {
        let style: String = style.to_lowercase().split_whitespace().collect();
        if style.contains("display:none") || style.contains("visibility:hidden") {
            return false;
        }
    }
    true
}

/// Collapsed text of an element's whole subtree.
#[must_use]
pub fn collapsed_text(el: ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Collapsed text of the element's direct text nodes only, ignoring
/// nested markup. Empty when the element has no direct text.
#[must_use]
pub fn own_text(el: ElementRef) -> String {
    let text: String = el
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect();
    collapse_whitespace(&text)
}

/// Whether the element has no element children.
#[must_use]
pub fn is_leaf(el: ElementRef) -> bool {
    !el.children().any(|node| node.value().is_element())
}

/// The section container for a heading: nearest `section` or `div`
/// ancestor, falling back to the parent, then the heading itself.
#[must_use]
pub fn section_container(heading: ElementRef) -> ElementRef {
    let ancestor = heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| matches!(el.value().name(), "section" | "div"));
    ancestor
        .or_else(|| heading.parent().and_then(ElementRef::wrap))
        .unwrap_or(heading)
}

/// Case-insensitive word-bounded matcher for a heading phrase, tolerant
/// of whitespace variations ("Basic Info" matches "Basic  Info").
fn heading_pattern(heading: &str) -> Regex {
    let escaped = heading
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s*");
    Regex::new(&format!(r"(?i)\b{escaped}\b")).expect("valid regex")
}
