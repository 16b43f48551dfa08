use crate::error::{BrowserError, Result};
use rand::Rng;
use std::time::Duration;

/// One selectable entry of an open dropdown popup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComboOption {
    /// Selector addressing this option for a follow-up click
    pub selector: String,
    /// Visible option text
    pub text: String,
}

/// The shape of control a label is expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Plain input, textarea, or contenteditable text surface
    Text,
    /// Dropdown opener, possibly a styled div rather than a select
    Combo,
    /// Literal checkbox input
    Checkbox,
}

impl ControlKind {
    pub(crate) fn as_js(self) -> &'static str {
        match self {
            ControlKind::Text => "text",
            ControlKind::Combo => "combo",
            ControlKind::Checkbox => "checkbox",
        }
    }
}

/// Browser actions for page scanning and form replay.
///
/// The harvest and replay engines are written against this trait so their
/// logic stays testable with scripted fakes.
#[async_trait::async_trait]
pub trait BrowserActions: Send + Sync {
    /// Navigate to a URL and wait for the navigation to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// URL of the current page
    async fn current_url(&self) -> Result<String>;

    /// Snapshot of the current DOM as HTML
    async fn html(&self) -> Result<String>;

    /// Scroll the window vertically by a pixel delta
    async fn scroll_by(&self, delta_y: i32) -> Result<()>;

    /// Scroll the window by a fraction of the viewport height
    async fn scroll_viewport_fraction(&self, fraction: f64) -> Result<()>;

    /// Scroll back to the top of the page
    async fn scroll_to_top(&self) -> Result<()>;

    /// Click an element by selector
    async fn click(&self, selector: &str) -> Result<()>;

    /// Click the next-arrow of the first gallery matching one of the
    /// container selectors; `false` when no advance control is present
    async fn advance_gallery(&self, container_selectors: &[String]) -> Result<bool>;

    /// Scroll the first matching gallery container by a pixel delta,
    /// doing nothing when no container is present
    async fn scroll_gallery(&self, container_selectors: &[String], delta_y: i32) -> Result<()>;

    /// Resolve a form control from a label pattern (case-insensitive
    /// regex), returning a selector for the tagged control, or `None`
    /// when nothing on the page matches
    async fn resolve_labeled_control(
        &self,
        label_pattern: &str,
        kind: ControlKind,
    ) -> Result<Option<String>>;

    /// Set an input's value through its native setter and fire the input
    /// and change events, so framework-managed forms observe the edit
    async fn set_text(&self, selector: &str, value: &str) -> Result<()>;

    /// Type text into an element with real per-character key events
    async fn type_text(&self, selector: &str, value: &str) -> Result<()>;

    /// Press the Enter key on an element
    async fn press_enter(&self, selector: &str) -> Result<()>;

    /// Whether a checkbox is currently checked
    async fn is_checked(&self, selector: &str) -> Result<bool>;

    /// Bring a checkbox to the desired state, clicking only when it differs
    async fn set_checkbox(&self, selector: &str, checked: bool) -> Result<()>;

    /// Whether any element matches the selector
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Visible text of the first element matching the selector
    async fn element_text(&self, selector: &str) -> Result<String>;

    /// The options of the currently open dropdown popup, excluding
    /// notification surfaces
    async fn visible_options(&self) -> Result<Vec<ComboOption>>;

    /// Selector for the search input embedded in the open popup, when
    /// the popup has one
    async fn popup_search_box(&self) -> Result<Option<String>>;
}

/// Helper to extract the host from a URL
pub fn extract_domain(url: &str) -> Result<String> {
    let url = url::Url::parse(url)
        .map_err(|e| BrowserError::NavigationError(format!("invalid URL: {e}")))?;

    url.host_str()
        .ok_or_else(|| BrowserError::NavigationError("no host in URL".to_string()))
        .map(|s| s.to_string())
}

/// A pause around `base_ms` with up to 20% random spread, so repeated
/// gallery clicks and keystrokes do not tick like a metronome.
#[must_use]
pub fn jittered(base_ms: u64) -> Duration {
    let spread = (base_ms / 5).max(1);
    let jitter = rand::thread_rng().gen_range(0..=spread * 2);
    Duration::from_millis(base_ms.saturating_sub(spread) + jitter)
}
