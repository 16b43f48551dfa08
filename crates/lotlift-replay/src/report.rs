//! Per-field outcomes of one replay run.

use crate::error::ReplayError;
use std::fmt;

/// How one planned field ended.
#[derive(Debug)]
pub enum FieldStatus {
    /// The value was written
    Set,
    /// The record had no value for this field
    Skipped,
    /// The attempt failed; later fields still ran
    Failed(ReplayError),
}

impl FieldStatus {
    /// Check if the field was written.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set)
    }

    /// Check if the field attempt failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldStatus::Set => f.write_str("set"),
            FieldStatus::Skipped => f.write_str("skipped"),
            FieldStatus::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Outcome of one field of the plan.
#[derive(Debug)]
pub struct FieldOutcome {
    /// Report name of the field
    pub field: &'static str,
    /// What happened to it
    pub status: FieldStatus,
}

/// Aggregate outcome of a replay run, in plan order.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Per-field outcomes
    pub outcomes: Vec<FieldOutcome>,
}

impl ReplayReport {
    pub(crate) fn push(&mut self, field: &'static str, status: FieldStatus) {
        self.outcomes.push(FieldOutcome { field, status });
    }

    /// Number of fields actually written.
    #[must_use]
    pub fn fields_set(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_set()).count()
    }

    /// Number of fields planned.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// One-line summary for the user.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Autofill finished, {}/{} fields set",
            self.fields_set(),
            self.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_only_set_fields() {
        let mut report = ReplayReport::default();
        report.push("year", FieldStatus::Set);
        report.push("make", FieldStatus::Skipped);
        report.push(
            "price",
            FieldStatus::Failed(ReplayError::ControlNotFound("^price$".to_string())),
        );

        assert_eq!(report.fields_set(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(report.summary(), "Autofill finished, 1/3 fields set");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FieldStatus::Set.to_string(), "set");
        assert_eq!(FieldStatus::Skipped.to_string(), "skipped");
        let failed = FieldStatus::Failed(ReplayError::NoOptionMatched("Teal".to_string()));
        assert_eq!(failed.to_string(), "failed: no dropdown option matched \"Teal\"");
    }
}
