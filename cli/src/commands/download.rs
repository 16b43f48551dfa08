//! Download a stored listing's photos.

use crate::context::AppContext;
use crate::service;
use anyhow::Result;
use lotlift_harvest::folder_name;

pub(crate) async fn run(ctx: &AppContext, url: Option<String>) -> Result<()> {
    let record = ctx.resolve_record(url).await?;
    if record.images.is_empty() {
        println!("No photos stored for {}", record.display_title());
        return Ok(());
    }

    let mut folder = folder_name(&record.display_title());
    if folder.is_empty() {
        folder = "listing".to_string();
    }

    let dir = service::download_dir(&ctx.config)?.join(&folder);
    println!(
        "Saving {} photos to {}",
        record.images.len(),
        dir.display()
    );

    let report = service::download_to_folder(ctx, &record.images, &folder).await?;
    println!("{}", report.summary());
    for error in &report.errors {
        println!("  {error}");
    }
    Ok(())
}
