//! Stored listing history commands.

use crate::context::AppContext;
use anyhow::Result;
use lotlift_core::text::group_thousands;
use lotlift_core::ListingRecord;

/// Print the history, most recent first.
pub(crate) async fn list(ctx: &AppContext) -> Result<()> {
    let history = ctx.store.history().await?;
    if history.is_empty() {
        println!("No listings scanned yet. Run 'lotlift scan <url>' first.");
        return Ok(());
    }

    println!(
        "{:<42} {:>10} {:>14}  {}",
        "VEHICLE", "PRICE", "MILEAGE", "URL"
    );
    println!("{}", "-".repeat(100));
    for record in history.records() {
        println!(
            "{:<42} {:>10} {:>14}  {}",
            truncated(&record.display_title(), 42),
            price_cell(record),
            mileage_cell(record),
            record.url
        );
    }
    Ok(())
}

/// Print one stored listing in full.
pub(crate) async fn show(ctx: &AppContext, url: Option<String>) -> Result<()> {
    let record = ctx.resolve_record(url).await?;

    println!("{}", record.display_title());
    println!("{}", "=".repeat(50));
    println!("URL:          {}", record.url);
    println!("Site:         {}", record.source);
    println!("Scanned:      {}", record.scraped_at.to_rfc3339());
    println!("Year:         {}", opt_cell(record.year.map(|y| y.to_string())));
    println!("Make:         {}", cell(&record.make));
    println!("Model:        {}", cell(&record.model));
    println!("Trim:         {}", cell(&record.trim));
    println!("Price:        {}", price_cell(&record));
    println!("Mileage:      {}", mileage_cell(&record));
    println!("Exterior:     {}", opt_cell(record.exterior_color.clone()));
    println!("Interior:     {}", opt_cell(record.interior_color.clone()));
    println!("Drivetrain:   {}", cell(&record.drivetrain));
    println!("Transmission: {}", cell(&record.transmission));
    println!("Engine:       {}", cell(&record.engine));
    println!("Fuel:         {}", cell(&record.fuel));
    println!(
        "VIN:          {}",
        opt_cell(record.vin.as_ref().map(|v| v.as_str().to_string()))
    );
    println!("Photos:       {}", record.images.len());

    if !record.description.is_empty() {
        println!();
        println!("Description:");
        println!("{}", record.description);
    }
    if let Some(ai) = &record.ai_description {
        println!();
        match &record.ai_model {
            Some(model) => println!("AI description ({model}):"),
            None => println!("AI description:"),
        }
        println!("{ai}");
    }
    Ok(())
}

pub(crate) fn price_cell(record: &ListingRecord) -> String {
    record
        .price
        .map_or_else(|| "-".to_string(), |p| format!("${}", group_thousands(p)))
}

pub(crate) fn mileage_cell(record: &ListingRecord) -> String {
    record.mileage.map_or_else(
        || "-".to_string(),
        |m| format!("{} miles", group_thousands(m)),
    )
}

fn cell(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn opt_cell(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn truncated(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}
