//! Scan a dealer listing page into the stored history.

use crate::commands::history::{mileage_cell, price_cell};
use crate::context::AppContext;
use anyhow::{Context as _, Result};
use lotlift_browser::{BrowserActions, BrowserEngine};
use lotlift_core::{ListingRecord, UpsertOutcome};
use lotlift_extract::{PageScope, RecordBuilder};
use lotlift_harvest::{harvest_images, prepare_page};
use lotlift_site::SiteDefinition;
use lotlift_store::settings::{keys, set_string};
use tracing::{debug, info};

/// Open the page, stimulate lazy content, extract the record, and
/// persist it as the current listing.
pub(crate) async fn run(ctx: &AppContext, url: &str) -> Result<()> {
    let definition = ctx
        .registry
        .match_url(url)
        .context("no site definition matches this URL; see 'lotlift sites'")?;
    println!("Scanning with the {} adapter...", definition.name());

    let engine = BrowserEngine::launch(ctx.config.browser.clone())
        .await
        .context("failed to launch the browser")?;
    let scraped = scrape(ctx, &engine, &definition, url).await;
    if let Err(e) = engine.close().await {
        debug!("browser shutdown: {e}");
    }
    let record = scraped?;

    let outcome = ctx.store.upsert_listing(&record).await?;
    set_string(ctx.store.pool(), keys::CURRENT_URL, &record.url).await?;
    info!(url = %record.url, "listing stored");

    print_summary(&record, outcome);
    Ok(())
}

/// Drive the live page, then extract the record from its settled
/// snapshot.
async fn scrape(
    ctx: &AppContext,
    engine: &BrowserEngine,
    definition: &SiteDefinition,
    url: &str,
) -> Result<ListingRecord> {
    let page = engine
        .open(url)
        .await
        .context("failed to open the listing page")?;
    prepare_page(&page, &ctx.config.scan, definition).await?;

    // Redirects may have moved the page; the live URL is the record key.
    let final_url = page.current_url().await.unwrap_or_else(|_| url.to_string());
    let html = page.html().await?;
    if let Err(e) = page.close().await {
        debug!("page close: {e}");
    }

    let scope = PageScope::new(&html);
    let mut record = RecordBuilder::new(definition).build_from_scope(&final_url, &scope);
    record.images = harvest_images(&scope, definition, record.vin.as_ref())?;
    Ok(record)
}

fn print_summary(record: &ListingRecord, outcome: UpsertOutcome) {
    println!("Scanned {}", record.display_title());
    println!("  URL:      {}", record.url);
    println!("  Price:    {}", price_cell(record));
    println!("  Mileage:  {}", mileage_cell(record));
    if let Some(vin) = &record.vin {
        println!("  VIN:      {}", vin.as_str());
    }
    println!("  Photos:   {}", record.images.len());

    let note = match outcome {
        UpsertOutcome::Updated => "updated the existing entry",
        UpsertOutcome::Inserted { evicted: false } => "added to history",
        UpsertOutcome::Inserted { evicted: true } => "added to history, oldest entry evicted",
    };
    println!("  History:  {note}");
}
