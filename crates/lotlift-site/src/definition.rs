//! Site definition types and structures.
//!
//! This module defines the data structures for site adapters loaded from TOML
//! files. A definition tells the shared extraction engine where a site keeps
//! its spec table, what its field labels look like, and which image URLs on
//! its pages are noise.

use crate::error::{Result, SiteError};
use chrono::NaiveDate;
use lotlift_core::SiteId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete site definition loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteDefinition {
    /// Core site metadata
    pub site: SiteMetadata,

    /// Field extraction configuration
    pub extract: ExtractRules,

    /// Photo gallery configuration
    #[serde(default)]
    pub gallery: GalleryRules,

    /// Image filtering configuration
    #[serde(default)]
    pub images: ImageRules,
}

impl SiteDefinition {
    /// Get the site ID.
    #[must_use]
    pub fn id(&self) -> &SiteId {
        &self.site.id
    }

    /// Get the site name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.site.name
    }

    /// Whether a page host belongs to this site.
    ///
    /// Matches when the host equals a configured domain or is a subdomain
    /// of one.
    #[must_use]
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        self.site.domains.iter().any(|domain| {
            let domain = domain.to_lowercase();
            host == domain || host.ends_with(&format!(".{domain}"))
        })
    }

    /// Label aliases configured for a field, empty when the site has none.
    #[must_use]
    pub fn labels_for(&self, field: FieldKey) -> &[String] {
        self.extract
            .field_labels
            .get(&field)
            .map_or(&[], Vec::as_slice)
    }

    /// Validate the site definition for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.site.name.is_empty() {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "site name cannot be empty".to_string(),
            });
        }

        if self.site.url.is_empty() {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "site URL cannot be empty".to_string(),
            });
        }

        if self.site.domains.is_empty() {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "at least one domain is required".to_string(),
            });
        }

        if self.extract.section_headings.is_empty() && self.extract.preview_headings.is_empty() {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "at least one section or preview heading is required".to_string(),
            });
        }

        if self.extract.field_labels.is_empty() {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "field_labels cannot be empty".to_string(),
            });
        }

        for (field, labels) in &self.extract.field_labels {
            if labels.is_empty() {
                return Err(SiteError::ValidationError {
                    site_id: self.site.id.to_string(),
                    reason: format!("field {field} has no label aliases"),
                });
            }
        }

        if self.images.min_width == 0 || self.images.min_height == 0 {
            return Err(SiteError::ValidationError {
                site_id: self.site.id.to_string(),
                reason: "image minimum dimensions must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Core site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    /// Unique site identifier (e.g., "capitol-chevrolet", "cars-com")
    pub id: SiteId,

    /// Human-readable site name
    pub name: String,

    /// Site homepage URL
    pub url: String,

    /// Hostnames this definition applies to (subdomains match)
    pub domains: Vec<String>,

    /// Date when this definition was last verified (YYYY-MM-DD)
    pub last_verified: NaiveDate,
}

/// The labeled fields the extraction engine knows how to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKey {
    /// Model year
    Year,
    /// Manufacturer
    Make,
    /// Model name
    Model,
    /// Trim level
    Trim,
    /// Odometer reading
    Mileage,
    /// Vehicle identification number
    Vin,
    /// Exterior color
    ExteriorColor,
    /// Interior color
    InteriorColor,
    /// Drivetrain
    Drivetrain,
    /// Transmission
    Transmission,
    /// Engine
    Engine,
    /// Fuel type or efficiency
    Fuel,
}

impl FieldKey {
    /// Fields carrying numeric values, where trailing nested markup must
    /// not leak into the captured text.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Year | Self::Mileage)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Year => "year",
            Self::Make => "make",
            Self::Model => "model",
            Self::Trim => "trim",
            Self::Mileage => "mileage",
            Self::Vin => "vin",
            Self::ExteriorColor => "exterior-color",
            Self::InteriorColor => "interior-color",
            Self::Drivetrain => "drivetrain",
            Self::Transmission => "transmission",
            Self::Engine => "engine",
            Self::Fuel => "fuel",
        };
        write!(f, "{name}")
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRules {
    /// Headings that mark the vehicle details section, in priority order
    /// (e.g. "Basic Info", "Basics")
    #[serde(default)]
    pub section_headings: Vec<String>,

    /// Headings of a summary card holding year/make/model/trim rows
    /// (e.g. "Vehicle preview")
    #[serde(default)]
    pub preview_headings: Vec<String>,

    /// Headings whose presence means lazily rendered sections have
    /// mounted; scanning scrolls until one appears
    #[serde(default)]
    pub settle_headings: Vec<String>,

    /// Headings of the free-text comments section; falls back to the
    /// page's meta description when empty or absent
    #[serde(default)]
    pub description_headings: Vec<String>,

    /// Labels marking the price element; empty means page-scan only
    #[serde(default)]
    pub price_labels: Vec<String>,

    /// Every label the site uses, for trimming a following label out of
    /// inline "Label: Value Label2: Value2" runs
    #[serde(default)]
    pub known_labels: Vec<String>,

    /// Label aliases per field, tried in order
    pub field_labels: HashMap<FieldKey, Vec<String>>,
}

/// Photo gallery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryRules {
    /// Container selectors tried in priority order
    pub selectors: Vec<String>,
}

impl Default for GalleryRules {
    fn default() -> Self {
        Self {
            selectors: default_gallery_selectors(),
        }
    }
}

/// The shared default gallery selector list.
#[must_use]
pub fn default_gallery_selectors() -> Vec<String> {
    [
        ".media-gallery",
        ".vehicle-photos",
        ".slider-for",
        ".swiper-wrapper",
        "[class*=\"gallery\"]",
        "[class*=\"photos\"]",
        "[class*=\"slider\"]",
        "[class*=\"carousel\"]",
        "[id*=\"gallery\"]",
        "[id*=\"photos\"]",
        "[id*=\"slider\"]",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Image filtering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRules {
    /// Site-specific URL substrings rejected in addition to the global
    /// noise set
    pub noise_tokens: Vec<String>,

    /// Host of a per-vehicle CDN that embeds the VIN in photo paths;
    /// enables VIN-match filtering
    pub vehicle_cdn_host: Option<String>,

    /// Broader CDN host whose URLs are only accepted when the path
    /// carries one of `restricted_host_tokens`
    pub restricted_host: Option<String>,

    /// Path tokens that mark a restricted-host URL as a vehicle photo
    pub restricted_host_tokens: Vec<String>,

    /// Minimum accepted width when the URL embeds WxH dimensions
    pub min_width: u32,

    /// Minimum accepted height when the URL embeds WxH dimensions
    pub min_height: u32,
}

impl Default for ImageRules {
    fn default() -> Self {
        Self {
            noise_tokens: Vec::new(),
            vehicle_cdn_host: None,
            restricted_host: None,
            restricted_host_tokens: ["vehicle", "photo", "image", "gallery"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_width: 400,
            min_height: 300,
        }
    }
}
