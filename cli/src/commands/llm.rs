//! AI description commands backed by a local Ollama server.

use crate::context::AppContext;
use crate::service;
use anyhow::{Context as _, Result};
use lotlift_llm::{build_prompt, DEFAULT_INSTRUCTIONS};
use lotlift_store::settings::{get_string, keys, set_string};
use tracing::warn;

/// Generate a description for a stored listing and attach it to the
/// record.
pub(crate) async fn describe(
    ctx: &AppContext,
    url: Option<String>,
    model: Option<String>,
    instructions: Option<String>,
) -> Result<()> {
    let record = ctx.resolve_record(url).await?;
    let pool = ctx.store.pool();

    let model = match model {
        Some(model) => {
            set_string(pool, keys::SELECTED_MODEL, &model).await?;
            model
        }
        None => get_string(pool, keys::SELECTED_MODEL)
            .await?
            .context("no model selected; see 'lotlift models' and pass --model once")?,
    };

    let instructions = match instructions {
        Some(instructions) => {
            set_string(pool, keys::AI_INSTRUCTIONS, &instructions).await?;
            instructions
        }
        None => get_string(pool, keys::AI_INSTRUCTIONS)
            .await?
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string()),
    };

    println!(
        "Generating a description for {} with {model}...",
        record.display_title()
    );
    let prompt = build_prompt(&instructions, &record);
    let description = service::generate(ctx, &model, &prompt).await?;
    let description = description.trim();

    if !ctx
        .store
        .set_ai_description(&record.url, description, &model)
        .await?
    {
        warn!(url = %record.url, "listing left the history before the description was stored");
    }

    println!();
    println!("{description}");
    Ok(())
}

/// List the models installed on the Ollama server, marking the selected
/// one.
pub(crate) async fn models(ctx: &AppContext, url: Option<String>) -> Result<()> {
    if let Some(url) = url {
        set_string(ctx.store.pool(), keys::OLLAMA_URL, &url).await?;
    }

    let models = service::list_models(ctx).await?;
    if models.is_empty() {
        println!("No models installed. Pull one with 'lotlift pull <model>'.");
        return Ok(());
    }

    let selected = get_string(ctx.store.pool(), keys::SELECTED_MODEL).await?;
    for model in models {
        let marker = if selected.as_deref() == Some(model.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {}", model.label());
    }
    Ok(())
}

/// Pull a model onto the Ollama server.
pub(crate) async fn pull(ctx: &AppContext, model: &str) -> Result<()> {
    println!("Pulling {model}; this can take a while...");
    service::pull_model(ctx, model).await?;
    println!("Pulled {model}");
    Ok(())
}
