//! In-memory site definition registry with lookup by ID and page URL.

use crate::{
    definition::SiteDefinition,
    error::{Result, SiteError},
    loader::SiteLoader,
};
use lotlift_core::SiteId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use url::Url;

/// In-memory cache of site definitions.
///
/// The registry loads definitions from disk and caches them in memory for
/// fast lookups. Pages are routed to a definition by hostname.
#[derive(Clone)]
pub struct SiteRegistry {
    /// Cached site definitions, indexed by site ID
    definitions: Arc<RwLock<HashMap<SiteId, SiteDefinition>>>,
}

impl SiteRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            definitions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a registry and load all definitions from the given loader.
    ///
    /// # Errors
    /// Returns error if loading fails.
    pub fn load_from(loader: &SiteLoader) -> Result<Self> {
        let registry = Self::new();
        registry.reload(loader)?;
        Ok(registry)
    }

    /// Reload all site definitions from the loader.
    ///
    /// This replaces the current cache with freshly loaded definitions.
    ///
    /// # Errors
    /// Returns error if loading fails.
    pub fn reload(&self, loader: &SiteLoader) -> Result<()> {
        let definitions = loader.load_all()?;

        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        cache.clear();

        for definition in definitions {
            let site_id = definition.id().clone();
            cache.insert(site_id, definition);
        }

        info!(count = cache.len(), "reloaded site definitions");

        Ok(())
    }

    /// Get a site definition by ID.
    ///
    /// # Errors
    /// Returns error if the site is not found.
    pub fn get(&self, site_id: &SiteId) -> Result<SiteDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .get(site_id)
            .cloned()
            .ok_or_else(|| SiteError::NotFound {
                site_id: site_id.to_string(),
            })
    }

    /// Find the definition whose domains match a page URL.
    ///
    /// # Errors
    /// Returns error if the URL has no host or no definition matches.
    pub fn match_url(&self, page_url: &str) -> Result<SiteDefinition> {
        let host = Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| SiteError::NoMatch {
                url: page_url.to_string(),
            })?;

        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache
            .values()
            .find(|def| def.matches_host(&host))
            .cloned()
            .ok_or_else(|| SiteError::NoMatch {
                url: page_url.to_string(),
            })
    }

    /// Get all site definitions.
    #[must_use]
    pub fn get_all(&self) -> Vec<SiteDefinition> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.values().cloned().collect()
    }

    /// Get all site IDs in the registry.
    #[must_use]
    pub fn get_all_ids(&self) -> Vec<SiteId> {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.keys().cloned().collect()
    }

    /// Get the total number of sites in the registry.
    #[must_use]
    pub fn count(&self) -> usize {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.len()
    }

    /// Check if a site exists in the registry.
    #[must_use]
    pub fn contains(&self, site_id: &SiteId) -> bool {
        let cache = self
            .definitions
            .read()
            .expect("acquire read lock on definitions");

        cache.contains_key(site_id)
    }

    /// Add or update a site definition in the registry.
    ///
    /// This is useful for testing or dynamic updates.
    pub fn insert(&self, definition: SiteDefinition) -> Result<()> {
        // Validate before inserting
        definition.validate()?;

        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        let site_id = definition.id().clone();
        cache.insert(site_id.clone(), definition);

        debug!(site_id = %site_id, "inserted site definition");

        Ok(())
    }

    /// Remove a site definition from the registry.
    ///
    /// Returns `true` if the site was present, `false` otherwise.
    pub fn remove(&self, site_id: &SiteId) -> bool {
        let mut cache = self
            .definitions
            .write()
            .expect("acquire write lock on definitions");

        let removed = cache.remove(site_id).is_some();

        if removed {
            debug!(site_id = %site_id, "removed site definition");
        }

        removed
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ExtractRules, FieldKey, GalleryRules, ImageRules, SiteMetadata};
    use chrono::NaiveDate;

    fn create_test_definition(id: &str, domain: &str) -> SiteDefinition {
        let mut field_labels = HashMap::new();
        field_labels.insert(FieldKey::Mileage, vec!["Mileage".to_string()]);

        SiteDefinition {
            site: SiteMetadata {
                id: SiteId::new(id).expect("valid site ID"),
                name: format!("Test {id}"),
                url: format!("https://www.{domain}"),
                domains: vec![domain.to_string()],
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
            gallery: GalleryRules::default(),
            images: ImageRules::default(),
        }
    }

    #[test]
    fn test_registry_new() {
        let registry = SiteRegistry::new();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_registry_insert_and_get() {
        let registry = SiteRegistry::new();
        let definition = create_test_definition("test-dealer", "testdealer.com");
        let site_id = definition.id().clone();

        registry.insert(definition).expect("insert definition");

        let retrieved = registry.get(&site_id).expect("get definition");
        assert_eq!(retrieved.id(), &site_id);
        assert_eq!(retrieved.name(), "Test test-dealer");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = SiteRegistry::new();
        let site_id = SiteId::new("nonexistent").expect("valid site ID");

        let result = registry.get(&site_id);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), SiteError::NotFound { .. }));
    }

    #[test]
    fn test_registry_match_url() {
        let registry = SiteRegistry::new();
        registry
            .insert(create_test_definition("dealer-a", "dealera.com"))
            .expect("insert dealer-a");
        registry
            .insert(create_test_definition("dealer-b", "dealerb.com"))
            .expect("insert dealer-b");

        let matched = registry
            .match_url("https://www.dealerb.com/inventory/used-2018-chevrolet-equinox")
            .expect("match URL");
        assert_eq!(matched.id().as_str(), "dealer-b");
    }

    #[test]
    fn test_registry_match_url_no_match() {
        let registry = SiteRegistry::new();
        registry
            .insert(create_test_definition("dealer-a", "dealera.com"))
            .expect("insert dealer-a");

        let result = registry.match_url("https://www.unknownsite.com/listing/1");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), SiteError::NoMatch { .. }));
    }

    #[test]
    fn test_registry_match_url_invalid_url() {
        let registry = SiteRegistry::new();
        let result = registry.match_url("not a url");
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_contains_and_remove() {
        let registry = SiteRegistry::new();
        let definition = create_test_definition("test-dealer", "testdealer.com");
        let site_id = definition.id().clone();

        assert!(!registry.contains(&site_id));

        registry.insert(definition).expect("insert definition");
        assert!(registry.contains(&site_id));

        assert!(registry.remove(&site_id));
        assert!(!registry.contains(&site_id));

        // Removing again should return false
        assert!(!registry.remove(&site_id));
    }

    #[test]
    fn test_registry_get_all_ids() {
        let registry = SiteRegistry::new();

        registry
            .insert(create_test_definition("site-one", "one.com"))
            .expect("insert site one");
        registry
            .insert(create_test_definition("site-two", "two.com"))
            .expect("insert site two");

        let ids = registry.get_all_ids();
        assert_eq!(ids.len(), 2);

        let id_strings: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert!(id_strings.contains(&"site-one".to_string()));
        assert!(id_strings.contains(&"site-two".to_string()));
    }
}
