//! List the loaded site definitions.

use crate::context::AppContext;
use anyhow::Result;

pub(crate) fn run(ctx: &AppContext) -> Result<()> {
    let mut definitions = ctx.registry.get_all();
    if definitions.is_empty() {
        println!("No site definitions loaded.");
        return Ok(());
    }
    definitions.sort_by(|a, b| a.id().as_str().cmp(b.id().as_str()));

    println!(
        "{:<20} {:<26} {:<12} {}",
        "ID", "NAME", "VERIFIED", "DOMAINS"
    );
    println!("{}", "-".repeat(90));
    for definition in &definitions {
        println!(
            "{:<20} {:<26} {:<12} {}",
            definition.id(),
            definition.name(),
            definition.site.last_verified,
            definition.site.domains.join(", ")
        );
    }
    Ok(())
}
