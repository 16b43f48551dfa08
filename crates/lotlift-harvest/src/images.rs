//! Vehicle photo collection from a page snapshot.
//!
//! Walks the parsed page for image URLs, gallery first, and runs them
//! through noise, dimension, and VIN filters before normalizing away
//! thumbnail path variants.

use crate::error::Result;
use lotlift_core::Vin;
use lotlift_extract::scope::is_visible;
use lotlift_extract::{gallery_selectors, PageScope};
use lotlift_site::{ImageRules, SiteDefinition};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

/// Listings carry at most this many photos
const MAX_IMAGES: usize = 20;

/// Below this count the gallery pass is considered starved and the whole
/// page is searched
const PAGE_FALLBACK_THRESHOLD: usize = 10;

/// Attributes checked on gallery elements, lazy-load variants included
const GALLERY_ATTRS: &[&str] = &[
    "src",
    "data-src",
    "data-lazy",
    "data-lazy-src",
    "data-original",
    "srcset",
    "data-srcset",
    "data-lazy-srcset",
    "data-image",
    "data-url",
    "data-full-src",
];

/// Reduced attribute set for the page-wide fallback pass
const PAGE_ATTRS: &[&str] = &["src", "data-src", "data-lazy", "srcset", "data-srcset"];

static IMAGE_ELEMENTS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img, source").expect("image selector is hardcoded and valid"));

static EXCLUDED_SECTIONS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "[class*=\"similar\"], [class*=\"related\"], [class*=\"recommend\"], \
         [id*=\"similar\"], [id*=\"related\"]",
    )
    .expect("excluded-section selector is hardcoded and valid")
});

static HTTP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("URL regex is hardcoded and valid"));

static EXTENSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp)").expect("extension regex is hardcoded and valid")
});

static NOISE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)sprite|icon|logo|favicon|avatar|profile|banner|badge|button|nav|menu|header|footer")
        .expect("noise regex is hardcoded and valid")
});

static DIMENSIONS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,4})x(\d{2,4})").expect("size regex is hardcoded and valid"));

static THUMBNAIL_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/thumbnails/[^/]+/").expect("path regex is hardcoded and valid"));

static SIZE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d{2,4}x\d{2,4}/").expect("path regex is hardcoded and valid"));

static SIZE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_\d{2,4}x\d{2,4}\.").expect("suffix regex is hardcoded and valid"));

/// Collect the photo URLs for the vehicle on the page.
///
/// The gallery container is searched first; when fewer than ten images
/// survive filtering, a page-wide pass (skipping similar-vehicle sections)
/// tops the list up. The result is deduplicated in first-seen order and
/// capped at twenty. An empty page yields an empty list, never an error.
pub fn harvest_images(
    scope: &PageScope,
    definition: &SiteDefinition,
    page_vin: Option<&Vin>,
) -> Result<Vec<String>> {
    let selectors = gallery_selectors(definition)?;
    let gallery = selectors
        .iter()
        .find_map(|sel| scope.document().select(sel).next().filter(is_visible));

    let area = gallery.unwrap_or_else(|| scope.main_content());

    let mut seen = std::collections::HashSet::new();
    let mut images = Vec::new();
    for el in area.select(&IMAGE_ELEMENTS) {
        for url in element_urls(el, GALLERY_ATTRS) {
            if !accept(&url, &definition.images, page_vin, true) {
                continue;
            }
            let normalized = normalize(&url);
            if seen.insert(normalized.clone()) {
                images.push(normalized);
            }
        }
    }
    debug!(
        "gallery pass found {} images (container: {})",
        images.len(),
        gallery.is_some()
    );

    if images.len() < PAGE_FALLBACK_THRESHOLD {
        let excluded: Vec<_> = scope
            .document()
            .select(&EXCLUDED_SECTIONS)
            .map(|el| el.id())
            .collect();
        let in_excluded = |el: &ElementRef| {
            excluded.contains(&el.id()) || el.ancestors().any(|node| excluded.contains(&node.id()))
        };

        for el in scope.document().select(&IMAGE_ELEMENTS) {
            if in_excluded(&el) {
                continue;
            }
            for url in element_urls(el, PAGE_ATTRS) {
                if !accept(&url, &definition.images, page_vin, false) {
                    continue;
                }
                let normalized = normalize(&url);
                if seen.insert(normalized.clone()) {
                    images.push(normalized);
                }
            }
        }
        debug!("page-wide pass brought the total to {}", images.len());
    }

    images.truncate(MAX_IMAGES);
    Ok(images)
}

/// Read every candidate URL off one element, expanding srcset entries
/// into their bare URLs.
fn element_urls(el: ElementRef, attrs: &[&str]) -> Vec<String> {
    let mut urls = Vec::new();
    for attr in attrs {
        let Some(value) = el.value().attr(attr) else {
            continue;
        };
        if attr.contains("srcset") {
            for entry in value.split(',') {
                if let Some(url) = entry.trim().split_whitespace().next() {
                    urls.push(url.to_string());
                }
            }
        } else {
            urls.push(value.to_string());
        }
    }
    urls
}

/// Whether a URL passes the photo filters.
///
/// The strict pass (gallery) also enforces minimum embedded dimensions and
/// the restricted-host token requirement; the page-wide pass retains only
/// the extension, noise, and VIN checks.
fn accept(url: &str, rules: &ImageRules, page_vin: Option<&Vin>, strict: bool) -> bool {
    if !HTTP_PATTERN.is_match(url) || !EXTENSION_PATTERN.is_match(url) {
        return false;
    }
    if NOISE_PATTERN.is_match(url) {
        return false;
    }
    let lower = url.to_lowercase();
    if rules
        .noise_tokens
        .iter()
        .any(|token| lower.contains(&token.to_lowercase()))
    {
        return false;
    }

    if strict {
        if let Some(caps) = DIMENSIONS_PATTERN.captures(url) {
            let width: u32 = caps[1].parse().unwrap_or(0);
            let height: u32 = caps[2].parse().unwrap_or(0);
            if width < rules.min_width || height < rules.min_height {
                return false;
            }
        }
    }

    // Per-vehicle CDN URLs embed the VIN; a mismatch means the photo
    // belongs to another listing on the same page.
    if let (Some(vin), Some(host)) = (page_vin, rules.vehicle_cdn_host.as_deref()) {
        if lower.contains(&host.to_lowercase()) {
            if let Some(embedded) = Vin::token_regex().find(url) {
                return embedded.as_str() == vin.as_str();
            }
        }
    }

    if strict {
        if let Some(host) = rules.restricted_host.as_deref() {
            if lower.contains(&host.to_lowercase()) {
                return rules
                    .restricted_host_tokens
                    .iter()
                    .any(|token| lower.contains(&token.to_lowercase()));
            }
        }
    }

    true
}

/// Rewrite a thumbnail URL to its full-size form.
fn normalize(url: &str) -> String {
    let mut normalized = THUMBNAIL_SEGMENT.replace_all(url, "/").into_owned();
    for segment in ["/thumb/", "/small/", "/medium/", "/large/"] {
        normalized = normalized.replace(segment, "/");
    }
    let normalized = SIZE_SEGMENT.replace_all(&normalized, "/");
    SIZE_SUFFIX.replace_all(&normalized, ".").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lotlift_core::SiteId;
    use lotlift_site::{ExtractRules, GalleryRules, SiteMetadata};
    use std::collections::HashMap;

    fn definition() -> SiteDefinition {
        SiteDefinition {
            site: SiteMetadata {
                id: SiteId::new("capitol-chevrolet").expect("valid site ID"),
                name: "Capitol Chevrolet".to_string(),
                url: "https://www.capitolchevysj.com".to_string(),
                domains: vec!["capitolchevysj.com".to_string()],
                last_verified: NaiveDate::from_ymd_opt(2026, 7, 9).expect("valid date"),
            },
            extract: ExtractRules {
                section_headings: vec!["Basic Info".to_string()],
                preview_headings: vec![],
                settle_headings: vec!["Basic Info".to_string()],
                description_headings: vec![],
                price_labels: vec![],
                known_labels: vec![],
                field_labels: HashMap::new(),
            },
            gallery: GalleryRules::default(),
            images: ImageRules {
                noise_tokens: vec!["edmunds".to_string(), "find-new-roads".to_string()],
                vehicle_cdn_host: Some("vehicle-images.dealerinspire.com".to_string()),
                restricted_host: Some("dealerinspire.com".to_string()),
                ..ImageRules::default()
            },
        }
    }

    const VIN: &str = "2GNAXMEV1J6102807";
    const OTHER_VIN: &str = "1GNSKCKC0FR195410";

    fn vin() -> Vin {
        Vin::new(VIN).expect("valid VIN")
    }

    #[test]
    fn test_gallery_images_collected_in_order() {
        let html = format!(
            r#"<html><body>
            <div class="media-gallery">
                <img src="https://photos.example.com/a.jpg">
                <img data-src="https://photos.example.com/b.jpg">
                <source srcset="https://photos.example.com/c.jpg 1024w, https://photos.example.com/c-small.jpg 300w">
            </div>
            <div class="similar-vehicles">
                <img src="https://photos.example.com/unrelated-{VIN}.jpg">
            </div>
            </body></html>"#
        );
        let scope = PageScope::new(&html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        // Gallery starved, so the page-wide pass runs, but the similar
        // section stays excluded.
        assert_eq!(
            images,
            vec![
                "https://photos.example.com/a.jpg",
                "https://photos.example.com/b.jpg",
                "https://photos.example.com/c.jpg",
                "https://photos.example.com/c-small.jpg",
            ]
        );
    }

    /// A gallery with enough photos to suppress the page-wide fallback,
    /// so only the strict filters run.
    fn full_gallery(extra: &str) -> String {
        let mut body = String::from(r#"<div class="media-gallery">"#);
        for i in 0..10 {
            body.push_str(&format!(
                r#"<img src="https://photos.example.com/photo-{i}.jpg">"#
            ));
        }
        body.push_str(extra);
        body.push_str("</div>");
        format!("<html><body>{body}</body></html>")
    }

    #[test]
    fn test_noise_and_small_images_rejected() {
        let html = full_gallery(
            r#"<img src="https://photos.example.com/logo.jpg">
               <img src="https://photos.example.com/edmunds-rating.jpg">
               <img src="https://photos.example.com/150x100/tiny.jpg">
               <img src="https://photos.example.com/800x600/keep.jpg">"#,
        );
        let scope = PageScope::new(&html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert_eq!(images.len(), 11);
        assert!(images.contains(&"https://photos.example.com/keep.jpg".to_string()));
        assert!(!images.iter().any(|u| u.contains("logo")));
        assert!(!images.iter().any(|u| u.contains("edmunds")));
        assert!(!images.iter().any(|u| u.contains("tiny")));
    }

    #[test]
    fn test_vin_policy_on_vehicle_cdn() {
        let html = format!(
            r#"<html><body><div class="media-gallery">
            <img src="https://vehicle-images.dealerinspire.com/abc/{VIN}/photo-01.jpg">
            <img src="https://vehicle-images.dealerinspire.com/abc/{OTHER_VIN}/photo-01.jpg">
            <img src="https://vehicle-images.dealerinspire.com/abc/unkeyed/photo-02.jpg">
        </div></body></html>"#
        );
        let scope = PageScope::new(&html);
        let images = harvest_images(&scope, &definition(), Some(&vin())).expect("harvest");
        assert!(images.iter().any(|u| u.contains(VIN)));
        assert!(!images.iter().any(|u| u.contains(OTHER_VIN)));
        assert!(images.iter().any(|u| u.contains("unkeyed")));
    }

    #[test]
    fn test_restricted_host_requires_vehicle_token() {
        let html = full_gallery(
            r#"<img src="https://cdn.dealerinspire.com/assets/promo.jpg">
               <img src="https://cdn.dealerinspire.com/vehicle/front.jpg">"#,
        );
        let scope = PageScope::new(&html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert!(images.contains(&"https://cdn.dealerinspire.com/vehicle/front.jpg".to_string()));
        assert!(!images.iter().any(|u| u.contains("promo")));
    }

    #[test]
    fn test_thumbnail_variants_normalize_and_dedup() {
        let html = r#"<html><body><div class="media-gallery">
            <img src="https://photos.example.com/thumbnails/480/car.jpg">
            <img src="https://photos.example.com/car.jpg">
            <img src="https://photos.example.com/thumb/car_640x480.jpg">
            <img src="https://photos.example.com/car_640x480.jpg">
        </div></body></html>"#;
        let scope = PageScope::new(html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert_eq!(images, vec!["https://photos.example.com/car.jpg"]);
    }

    #[test]
    fn test_hidden_gallery_is_skipped() {
        let html = r#"<html><body>
            <div class="media-gallery" style="display:none">
                <img src="https://photos.example.com/stale.jpg">
            </div>
            <main>
                <img src="https://photos.example.com/live.jpg">
            </main>
        </body></html>"#;
        let scope = PageScope::new(html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert!(images.contains(&"https://photos.example.com/live.jpg".to_string()));
    }

    #[test]
    fn test_capped_at_twenty() {
        let mut body = String::from(r#"<div class="media-gallery">"#);
        for i in 0..30 {
            body.push_str(&format!(
                r#"<img src="https://photos.example.com/photo-{i}.jpg">"#
            ));
        }
        body.push_str("</div>");
        let html = format!("<html><body>{body}</body></html>");
        let scope = PageScope::new(&html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert_eq!(images.len(), 20);
        assert_eq!(images[0], "https://photos.example.com/photo-0.jpg");
    }

    #[test]
    fn test_empty_page_yields_empty_list() {
        let scope = PageScope::new("<html><body><p>No photos here.</p></body></html>");
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert!(images.is_empty());
    }

    #[test]
    fn test_page_fallback_skips_dimension_filter() {
        // Ten gallery images suppress the fallback; with fewer, small
        // images elsewhere on the page are still picked up.
        let html = r#"<html><body>
            <div class="media-gallery">
                <img src="https://photos.example.com/main.jpg">
            </div>
            <div class="listing-body">
                <img src="https://photos.example.com/320x240/detail.jpg">
            </div>
        </body></html>"#;
        let scope = PageScope::new(html);
        let images = harvest_images(&scope, &definition(), None).expect("harvest");
        assert!(images.contains(&"https://photos.example.com/detail.jpg".to_string()));
    }
}
