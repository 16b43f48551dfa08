//! Shared state for command handlers.

use anyhow::{Context as _, Result};
use lotlift_core::{AppConfig, ListingRecord};
use lotlift_site::{SiteLoader, SiteRegistry};
use lotlift_store::settings::{self, keys};
use lotlift_store::Store;

/// Everything a command handler needs: configuration, the site
/// registry, and the opened store.
pub(crate) struct AppContext {
    pub config: AppConfig,
    pub registry: SiteRegistry,
    pub store: Store,
}

impl AppContext {
    /// Load configuration, site definitions, and the listing store.
    pub(crate) async fn init(headless_override: Option<bool>) -> Result<Self> {
        let mut config = AppConfig::load_with_env().context("failed to load configuration")?;
        if let Some(headless) = headless_override {
            config.browser.headless = headless;
        }

        let loader =
            SiteLoader::with_default_dir().context("site definitions directory not found")?;
        let registry =
            SiteRegistry::load_from(&loader).context("failed to load site definitions")?;

        let data_dir = AppConfig::data_dir().context("failed to resolve the data directory")?;
        let store = Store::open(data_dir.join("lotlift.db"))
            .await
            .context("failed to open the listing database")?;

        Ok(Self {
            config,
            registry,
            store,
        })
    }

    /// Resolve which stored listing a command acts on: the given URL, or
    /// the most recently scanned one.
    pub(crate) async fn resolve_record(&self, url: Option<String>) -> Result<ListingRecord> {
        let url = match url {
            Some(url) => url,
            None => settings::get_string(self.store.pool(), keys::CURRENT_URL)
                .await?
                .context("no listing scanned yet; run 'lotlift scan <url>' first")?,
        };

        self.store
            .find_listing(&url)
            .await?
            .with_context(|| format!("no stored listing for {url}"))
    }

    /// Release held resources.
    pub(crate) async fn close(self) {
        self.store.close().await;
    }
}
