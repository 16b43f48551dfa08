//! Drives the marketplace form field by field.
//!
//! Every planned field produces an outcome; a miss on one field never
//! stops the ones after it.

use crate::error::{ReplayError, Result};
use crate::fields::{field_plan, FieldStep, FieldValue, MAKE_LABEL, YEAR_LABEL};
use crate::report::{FieldStatus, ReplayReport};
use crate::wait::wait_until;
use lotlift_browser::{jittered, BrowserActions, ComboOption, ControlKind};
use lotlift_core::config::ReplayConfig;
use lotlift_core::record::ListingRecord;
use lotlift_core::text::collapse_whitespace;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Fill the open marketplace form from a record.
///
/// Walks the ordered field plan, resolving each control by its label
/// and writing the record's value. The vehicle-type choice re-renders
/// the form, so after the first field the run waits for the year and
/// make controls to mount before continuing.
pub async fn replay_listing(
    actions: &dyn BrowserActions,
    config: &ReplayConfig,
    record: &ListingRecord,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    let mut steps = field_plan(record).into_iter();

    if let Err(e) = actions.scroll_to_top().await {
        debug!("initial scroll failed: {e}");
    }

    if let Some(first) = steps.next() {
        fill_field(actions, config, &first, &mut report).await;
        await_control(actions, config, YEAR_LABEL, ControlKind::Combo).await;
        await_control(actions, config, MAKE_LABEL, ControlKind::Combo).await;
    }

    for step in steps {
        fill_field(actions, config, &step, &mut report).await;
        tokio::time::sleep(jittered(config.field_pause_ms)).await;
    }

    info!("{}", report.summary());
    report
}

async fn fill_field(
    actions: &dyn BrowserActions,
    config: &ReplayConfig,
    step: &FieldStep,
    report: &mut ReplayReport,
) {
    if !step.has_value() {
        debug!("{}: no value, skipping", step.name);
        report.push(step.name, FieldStatus::Skipped);
        return;
    }
    match try_fill(actions, config, step).await {
        Ok(()) => {
            debug!("{}: set", step.name);
            report.push(step.name, FieldStatus::Set);
        }
        Err(err) => {
            warn!("{}: {err}", step.name);
            report.push(step.name, FieldStatus::Failed(err));
        }
    }
}

async fn try_fill(
    actions: &dyn BrowserActions,
    config: &ReplayConfig,
    step: &FieldStep,
) -> Result<()> {
    let selector = await_control(actions, config, step.label_pattern, step.kind())
        .await
        .ok_or_else(|| ReplayError::ControlNotFound(step.label_pattern.to_string()))?;

    match &step.value {
        FieldValue::Text(value) => Ok(actions.set_text(&selector, value).await?),
        FieldValue::Checkbox(checked) => Ok(actions.set_checkbox(&selector, *checked).await?),
        FieldValue::Combo(value) => select_option(actions, config, &selector, value).await,
    }
}

/// Poll for a control matching the label pattern until the resolve
/// timeout elapses.
async fn await_control(
    actions: &dyn BrowserActions,
    config: &ReplayConfig,
    pattern: &str,
    kind: ControlKind,
) -> Option<String> {
    wait_until(
        Duration::from_millis(config.resolve_timeout_ms),
        Duration::from_millis(config.resolve_interval_ms),
        || async {
            actions
                .resolve_labeled_control(pattern, kind)
                .await
                .ok()
                .flatten()
        },
    )
    .await
}

/// Open a dropdown and choose `value`: exact text match first, then
/// substring in either direction, then the popup's embedded search box.
/// When no popup appears at all the control is treated as free-text.
async fn select_option(
    actions: &dyn BrowserActions,
    config: &ReplayConfig,
    opener: &str,
    value: &str,
) -> Result<()> {
    actions.click(opener).await?;
    tokio::time::sleep(jittered(config.step_pause_ms)).await;

    let popup = wait_until(
        Duration::from_millis(config.popup_wait_ms),
        Duration::from_millis(config.resolve_interval_ms),
        || async {
            match actions.visible_options().await {
                Ok(options) if !options.is_empty() => Some(options),
                _ => None,
            }
        },
    )
    .await;

    let Some(options) = popup else {
        actions.type_text(opener, value).await?;
        actions.press_enter(opener).await?;
        return Ok(());
    };

    if let Some(option) = match_option(&options, value) {
        actions.click(&option.selector).await?;
        tokio::time::sleep(jittered(config.step_pause_ms)).await;
        return Ok(());
    }

    if let Some(search) = actions.popup_search_box().await? {
        actions.set_text(&search, "").await?;
        actions.type_text(&search, value).await?;
        actions.press_enter(&search).await?;
        tokio::time::sleep(jittered(config.step_pause_ms)).await;
        return Ok(());
    }

    Err(ReplayError::NoOptionMatched(value.to_string()))
}

/// Exact case-insensitive match wins; otherwise the first option whose
/// text contains the value or is contained by it.
fn match_option<'a>(options: &'a [ComboOption], value: &str) -> Option<&'a ComboOption> {
    let want = collapse_whitespace(value).to_lowercase();

    if let Some(exact) = options.iter().find(|o| o.text.to_lowercase() == want) {
        return Some(exact);
    }
    options.iter().find(|o| {
        let text = o.text.to_lowercase();
        text.contains(&want) || want.contains(&text)
    })
}
