//! Shared types used across the Lotlift pipeline.
//!
//! This module defines common newtypes that provide type safety
//! and clear domain modeling.

use crate::error::LotliftError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for site adapter identifiers with validation.
///
/// Site IDs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteId(String);

impl SiteId {
    /// Create a new `SiteId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, LotliftError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate site ID format: lowercase alphanumeric with hyphens, 3-50 chars.
    fn validate(id: &str) -> Result<(), LotliftError> {
        static SITE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SITE_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(LotliftError::Validation(format!(
                "invalid site ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(LotliftError::Validation(format!(
                "invalid site ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for 17-character Vehicle Identification Numbers.
///
/// VINs use a fixed alphabet that excludes I, O, and Q to avoid confusion
/// with 1 and 0. Input is uppercased before validation. The format is
/// checked but the check digit is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vin(String);

impl Vin {
    /// Create a new `Vin` from a string, uppercasing it first.
    ///
    /// # Errors
    /// Returns error unless the input is exactly 17 characters from
    /// `[A-HJ-NPR-Z0-9]`.
    pub fn new(vin: impl Into<String>) -> Result<Self, LotliftError> {
        let vin = vin.into().to_ascii_uppercase();
        Self::validate(&vin)?;
        Ok(Self(vin))
    }

    /// Parse a VIN out of arbitrary text, returning `None` when no
    /// well-formed VIN token is present.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Self> {
        Self::token_regex()
            .find(&text.to_ascii_uppercase())
            .map(|m| Self(m.as_str().to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The VIN token pattern, shared with callers that scan URLs for
    /// embedded VINs.
    pub fn token_regex() -> &'static Regex {
        static VIN_TOKEN: OnceLock<Regex> = OnceLock::new();
        VIN_TOKEN.get_or_init(|| Regex::new(r"[A-HJ-NPR-Z0-9]{17}").expect("valid regex"))
    }

    fn validate(vin: &str) -> Result<(), LotliftError> {
        static VIN_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = VIN_REGEX
            .get_or_init(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid regex"));

        if regex.is_match(vin) {
            Ok(())
        } else {
            Err(LotliftError::Validation(format!(
                "invalid VIN: must be 17 characters from [A-HJ-NPR-Z0-9], got '{vin}'"
            )))
        }
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
///
/// Provides serialization/deserialization and utility methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Create a timestamp from a `DateTime<Utc>`.
    #[must_use]
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, LotliftError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| LotliftError::Validation(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}
