//! Lotlift Extract - Listing page extraction engine.
//!
//! This crate turns a dealer listing page snapshot into a normalized
//! [`ListingRecord`](lotlift_core::ListingRecord), driven entirely by data
//! from a [`SiteDefinition`](lotlift_site::SiteDefinition). There is no
//! per-site code: sites differ only in their headings, field labels, and
//! image noise rules.
//!
//! # Architecture
//!
//! - Visibility-aware page scope over the parsed HTML
//! - A three-stage label cascade (structured rows, inline `Label: value`
//!   runs, page-wide scan)
//! - Title decomposition into year/make/model/trim
//! - Dedicated price, VIN, and description extractors
//! - A record builder that wires the pieces together per site definition
//!
//! # Example
//!
//! ```rust,ignore
//! use lotlift_extract::RecordBuilder;
//!
//! let definition = registry.match_url(url)?;
//! let builder = RecordBuilder::new(&definition);
//! let record = builder.build(url, &html);
//! println!("{}", record.display_title());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builder;
pub mod cascade;
pub mod description;
#[allow(missing_docs)]
pub mod error;
pub mod extraction;
pub mod price;
pub mod scope;
pub mod selectors;
pub mod title;
pub mod vin;

// Re-export commonly used types
pub use builder::RecordBuilder;
pub use cascade::Cascade;
pub use description::extract_description;
pub use error::{ExtractError, Result};
pub use extraction::Extraction;
pub use price::extract_price;
pub use scope::PageScope;
pub use selectors::gallery_selectors;
pub use title::{parse_title, TitleParse};
pub use vin::extract_vin;
