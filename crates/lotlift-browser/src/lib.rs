//! Browser automation engine for JavaScript-heavy listing pages.
//!
//! Provides headless Chromium control with per-domain rate limiting,
//! gallery stimulation, and form interaction for marketplace replay.

pub mod actions;
pub mod engine;
pub mod error;
pub mod page;

pub use actions::{extract_domain, jittered, BrowserActions, ComboOption, ControlKind};
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
pub use page::BrowserPage;
