//! Core types and utilities shared across all Lotlift crates.
//!
//! This crate provides:
//! - Common domain types ([`SiteId`], [`Vin`], [`Timestamp`])
//! - The [`ListingRecord`] data model and bounded [`VehicleHistory`]
//! - Text normalization and the fixed color palette
//! - Marketplace attribute inference (body style, fuel, transmission)
//! - Error types used throughout the application
//! - Configuration loading and management
//!
//! # Example
//!
//! ```rust,ignore
//! use lotlift_core::{AppConfig, ListingRecord, SiteId};
//!
//! let config = AppConfig::load_with_env()?;
//! let site = SiteId::new("capitol-chevrolet")?;
//! let record = ListingRecord::new(site, "https://example.com/inventory/123");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod color;
pub mod config;
pub mod error;
pub mod record;
pub mod text;
pub mod types;
pub mod vehicle;

pub use color::canonicalize_color;
pub use config::{AppConfig, BrowserConfig, DownloadConfig, OllamaConfig, ReplayConfig, ScanConfig};
pub use error::{ConfigError, ConfigResult, LotliftError, Result};
pub use record::{ListingRecord, UpsertOutcome, VehicleHistory, HISTORY_CAP, MAX_IMAGES};
pub use types::{SiteId, Timestamp, Vin};
