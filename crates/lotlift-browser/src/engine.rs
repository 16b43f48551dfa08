use crate::actions::{extract_domain, BrowserActions};
use crate::error::{BrowserError, Result};
use crate::page::BrowserPage;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::stream::StreamExt;
use lotlift_core::config::BrowserConfig as BrowserSettings;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

const MIN_DOMAIN_DELAY_MS: u64 = 1000;

/// Rate limiter per domain. Reservations queue: each call claims the next
/// free slot and returns how long the caller must wait for it.
#[derive(Debug)]
struct RateLimiter {
    next_slot: HashMap<String, Instant>,
    min_delay: Duration,
}

impl RateLimiter {
    fn new(min_delay_ms: u64) -> Self {
        Self {
            next_slot: HashMap::new(),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    fn reserve(&mut self, domain: &str) -> Duration {
        let now = Instant::now();
        let ready = match self.next_slot.get(domain) {
            Some(slot) => (*slot + self.min_delay).max(now),
            None => now,
        };
        self.next_slot.insert(domain.to_string(), ready);
        ready - now
    }
}

/// Browser automation engine: one launched Chromium instance handing out
/// pages, with per-domain pacing between opens.
pub struct BrowserEngine {
    browser: Browser,
    settings: BrowserSettings,
    rate_limiter: Arc<RwLock<RateLimiter>>,
}

impl BrowserEngine {
    /// Launch a Chromium instance with the given settings.
    pub async fn launch(settings: BrowserSettings) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(settings.window_width, settings.window_height)
            .request_timeout(Duration::from_secs(settings.navigation_timeout_secs))
            .no_sandbox();
        if !settings.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(BrowserError::ChromiumError)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Spawn browser handler
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            settings,
            rate_limiter: Arc::new(RwLock::new(RateLimiter::new(MIN_DOMAIN_DELAY_MS))),
        })
    }

    /// Open a new tab on `url`, pacing repeated opens against the same domain.
    pub async fn open(&self, url: &str) -> Result<BrowserPage> {
        let domain = extract_domain(url)?;
        let wait = self.rate_limiter.write().await.reserve(&domain);
        if !wait.is_zero() {
            debug!("pacing {domain}: waiting {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        let page = BrowserPage::new(
            page,
            Duration::from_secs(self.settings.navigation_timeout_secs),
        );
        page.navigate(url).await?;
        Ok(page)
    }

    /// Shut the browser down and wait for the process to exit.
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        let _ = self.browser.wait().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_first_access_is_free() {
        let mut limiter = RateLimiter::new(100);
        assert_eq!(limiter.reserve("example.com"), Duration::ZERO);
    }

    #[test]
    fn test_rate_limiter_immediate_second_access_waits() {
        let mut limiter = RateLimiter::new(100);
        limiter.reserve("example.com");
        let wait = limiter.reserve("example.com");
        assert!(wait > Duration::from_millis(90));
        assert!(wait <= Duration::from_millis(100));
    }

    #[test]
    fn test_rate_limiter_reservations_queue() {
        let mut limiter = RateLimiter::new(100);
        limiter.reserve("example.com");
        limiter.reserve("example.com");
        let third = limiter.reserve("example.com");
        assert!(third > Duration::from_millis(190));
    }

    #[test]
    fn test_rate_limiter_different_domains() {
        let mut limiter = RateLimiter::new(100);
        limiter.reserve("example.com");
        assert_eq!(limiter.reserve("other.com"), Duration::ZERO);
    }
}
