//! Error types for form replay.

use lotlift_browser::BrowserError;
use thiserror::Error;

/// Result alias for replay operations.
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Failure of a single form-field attempt.
///
/// These never abort a run; they are collected per field in the
/// [`ReplayReport`](crate::ReplayReport).
#[derive(Debug, Error)]
pub enum ReplayError {
    /// No control on the page matched the field's label pattern
    #[error("no control matched label pattern {0:?}")]
    ControlNotFound(String),

    /// A dropdown opened but nothing in it matched the value
    #[error("no dropdown option matched {0:?}")]
    NoOptionMatched(String),

    /// The browser layer failed mid-interaction
    #[error(transparent)]
    Browser(#[from] BrowserError),
}
