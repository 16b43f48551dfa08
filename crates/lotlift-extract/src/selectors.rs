//! Compilation of selector strings from site definitions.
//!
//! Gallery selectors arrive as free text in TOML; a typo there should
//! surface as a named error against the site definition, not a panic in
//! the middle of a scan.

use crate::error::{ExtractError, Result};
use lotlift_site::SiteDefinition;
use scraper::Selector;

/// Compile the definition's gallery container selectors, in priority order.
pub fn gallery_selectors(definition: &SiteDefinition) -> Result<Vec<Selector>> {
    definition
        .gallery
        .selectors
        .iter()
        .map(|raw| {
            Selector::parse(raw).map_err(|_| ExtractError::BadSelector {
                site_id: definition.id().to_string(),
                selector: raw.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lotlift_core::SiteId;
    use lotlift_site::{ExtractRules, FieldKey, GalleryRules, ImageRules, SiteMetadata};
    use std::collections::HashMap;

    fn definition_with_selectors(selectors: Vec<String>) -> SiteDefinition {
        let mut field_labels = HashMap::new();
        field_labels.insert(FieldKey::Mileage, vec!["Mileage".to_string()]);

        SiteDefinition {
            site: SiteMetadata {
                id: SiteId::new("test-dealer").expect("valid site ID"),
                name: "Test Dealer".to_string(),
                url: "https://www.testdealer.com".to_string(),
                domains: vec!["testdealer.com".to_string()],
                last_verified: NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date"),
            },
            extract: ExtractRules {
                section_headings: vec!["Basic Info".to_string()],
                preview_headings: vec![],
                settle_headings: vec![],
                description_headings: vec![],
                price_labels: vec![],
                known_labels: vec![],
                field_labels,
            },
            gallery: GalleryRules { selectors },
            images: ImageRules::default(),
        }
    }

    #[test]
    fn test_defaults_compile() {
        let definition = definition_with_selectors(
            lotlift_site::default_gallery_selectors(),
        );
        let compiled = gallery_selectors(&definition).expect("compile default selectors");
        assert_eq!(compiled.len(), definition.gallery.selectors.len());
    }

    #[test]
    fn test_bad_selector_is_named() {
        let definition =
            definition_with_selectors(vec![".gallery".to_string(), "[class*=".to_string()]);
        let err = gallery_selectors(&definition).expect_err("reject malformed selector");
        let message = err.to_string();
        assert!(message.contains("test-dealer"));
        assert!(message.contains("[class*="));
    }
}
