//! Autofill the Marketplace vehicle form from a stored listing.

use crate::context::AppContext;
use anyhow::{Context as _, Result};
use lotlift_browser::BrowserEngine;
use lotlift_core::ListingRecord;
use lotlift_replay::replay_listing;
use tracing::debug;

/// Where Facebook hosts the vehicle listing form.
const CREATE_FORM_URL: &str = "https://www.facebook.com/marketplace/create/vehicle";

/// Open the Marketplace form in a visible browser and fill it from the
/// stored record. Publishing stays with the user.
pub(crate) async fn run(ctx: &AppContext, url: Option<String>) -> Result<()> {
    let record = ctx.resolve_record(url).await?;
    println!("Relisting {}", record.display_title());

    // The user reviews and publishes the filled form themselves, so the
    // window must be visible regardless of the headless setting.
    let mut browser_settings = ctx.config.browser.clone();
    browser_settings.headless = false;

    let engine = BrowserEngine::launch(browser_settings)
        .await
        .context("failed to launch the browser")?;
    let outcome = fill_form(ctx, &engine, &record).await;
    if let Err(e) = engine.close().await {
        debug!("browser shutdown: {e}");
    }
    outcome
}

async fn fill_form(ctx: &AppContext, engine: &BrowserEngine, record: &ListingRecord) -> Result<()> {
    let page = engine
        .open(CREATE_FORM_URL)
        .await
        .context("failed to open the Marketplace form")?;

    println!("Log into Facebook in the browser window if it asks.");
    println!("Press Enter once the vehicle form is on screen to start the autofill.");
    wait_for_enter();

    let report = replay_listing(&page, &ctx.config.replay, record).await;
    println!("{}", report.summary());
    for outcome in &report.outcomes {
        println!("  {:<18} {}", outcome.field, outcome.status);
    }

    println!();
    println!("Review the listing in the browser window and publish it from there.");
    println!("Press Enter to close the browser.");
    wait_for_enter();
    Ok(())
}

fn wait_for_enter() {
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}
