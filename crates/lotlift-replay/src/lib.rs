//! Marketplace form replay driven by a listing record.
//!
//! Resolves each form control by its visible label through the browser
//! layer and writes the record's values in the order the target form
//! unlocks them. Field misses are collected in a per-run report and
//! never abort the remaining fields.

pub mod engine;
pub mod error;
pub mod fields;
pub mod report;
pub mod wait;

pub use engine::replay_listing;
pub use error::{ReplayError, Result};
pub use fields::{field_plan, FieldStep, FieldValue, VEHICLE_TYPE_OPTION};
pub use report::{FieldOutcome, FieldStatus, ReplayReport};
pub use wait::wait_until;
