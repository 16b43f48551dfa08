//! Lotlift Site - Data-driven site adapters for listing extraction.
//!
//! This crate provides the site definition system that routes listing pages
//! to extraction rules. Per-site heuristics (section headings, field labels,
//! gallery selectors, image noise) live in TOML definition files consumed by
//! the shared extraction engine.
//!
//! # Architecture
//!
//! - **Definition Types** ([`definition`]): Strongly-typed site metadata and rules
//! - **Loader** ([`loader`]): TOML file loading from `site-definitions/` directory
//! - **Registry** ([`registry`]): In-memory cache with ID and URL lookup
//! - **Errors** ([`error`]): Site-specific error types
//!
//! # Example
//!
//! ```rust,ignore
//! use lotlift_site::{SiteLoader, SiteRegistry};
//!
//! let loader = SiteLoader::with_default_dir()?;
//! let registry = SiteRegistry::load_from(&loader)?;
//!
//! // Route a listing page to its definition
//! let definition = registry.match_url("https://www.cars.com/vehicledetail/abc123/")?;
//! println!("Site: {}", definition.name());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod definition;
pub mod error;
pub mod loader;
pub mod registry;

// Re-export commonly used types
pub use definition::{
    default_gallery_selectors, ExtractRules, FieldKey, GalleryRules, ImageRules, SiteDefinition,
    SiteMetadata,
};
pub use error::{Result, SiteError};
pub use loader::SiteLoader;
pub use registry::SiteRegistry;
