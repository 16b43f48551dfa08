//! Lotlift - lift dealer vehicle listings into Facebook Marketplace.
//!
//! Entry point: parses arguments, installs tracing, builds the shared
//! command context, and dispatches to the command handlers.

mod cli;
mod commands;
mod context;
mod service;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOTLIFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let ctx = AppContext::init(cli.headless).await?;

    let outcome = dispatch(&ctx, cli.command).await;
    ctx.close().await;
    outcome
}

async fn dispatch(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Scan { url } => commands::scan::run(ctx, &url).await,
        Commands::History => commands::history::list(ctx).await,
        Commands::Show { url } => commands::history::show(ctx, url).await,
        Commands::Describe {
            url,
            model,
            instructions,
        } => commands::llm::describe(ctx, url, model, instructions).await,
        Commands::Models { url } => commands::llm::models(ctx, url).await,
        Commands::Pull { model } => commands::llm::pull(ctx, &model).await,
        Commands::Download { url } => commands::download::run(ctx, url).await,
        Commands::Relist { url } => commands::relist::run(ctx, url).await,
        Commands::Sites => commands::sites::run(ctx),
    }
}
