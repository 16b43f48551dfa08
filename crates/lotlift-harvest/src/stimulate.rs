//! Lazy-load stimulation before the page snapshot is taken.
//!
//! Listing pages render their spec table and most gallery photos only
//! after scrolling and gallery interaction, so the scan drives the live
//! page a little before reading its HTML.

use crate::error::Result;
use lotlift_browser::{jittered, BrowserActions};
use lotlift_core::config::ScanConfig;
use lotlift_extract::PageScope;
use lotlift_site::SiteDefinition;
use std::time::Duration;
use tracing::debug;

/// Upper bound on settle scroll rounds
const SETTLE_SCROLL_ROUNDS: u32 = 6;

/// Pixels the gallery container is nudged down and back up
const GALLERY_SCROLL_PX: i32 = 500;

/// Let the page settle, scroll until the details section headings
/// appear, then click through the gallery to force photos to load.
pub async fn prepare_page(
    actions: &dyn BrowserActions,
    scan: &ScanConfig,
    definition: &SiteDefinition,
) -> Result<()> {
    tokio::time::sleep(Duration::from_millis(scan.settle_ms)).await;
    settle_page(actions, scan, &definition.extract.settle_headings).await?;
    stimulate_gallery(actions, scan, &definition.gallery.selectors).await?;
    actions.scroll_to_top().await?;
    Ok(())
}

/// Scroll down in viewport steps until one of the given headings shows up,
/// bounded at six rounds.
pub async fn settle_page(
    actions: &dyn BrowserActions,
    scan: &ScanConfig,
    headings: &[String],
) -> Result<()> {
    for round in 0..SETTLE_SCROLL_ROUNDS {
        actions.scroll_viewport_fraction(0.7).await?;
        tokio::time::sleep(jittered(scan.scroll_delay_ms)).await;
        let html = actions.html().await?;
        if PageScope::new(&html).has_any_heading(headings) {
            debug!("page settled after {} scroll rounds", round + 1);
            break;
        }
    }
    Ok(())
}

/// Click the gallery's next-arrow repeatedly, then nudge the container
/// down and back up. Stops early once no advance control responds.
pub async fn stimulate_gallery(
    actions: &dyn BrowserActions,
    scan: &ScanConfig,
    selectors: &[String],
) -> Result<()> {
    for click in 0..scan.gallery_advance_clicks {
        if !actions.advance_gallery(selectors).await? {
            debug!("gallery advance stopped after {click} clicks");
            break;
        }
        tokio::time::sleep(jittered(scan.gallery_click_delay_ms)).await;
    }

    actions.scroll_gallery(selectors, GALLERY_SCROLL_PX).await?;
    tokio::time::sleep(jittered(scan.scroll_delay_ms)).await;
    actions.scroll_gallery(selectors, -GALLERY_SCROLL_PX).await?;
    tokio::time::sleep(jittered(scan.scroll_delay_ms)).await;
    Ok(())
}
