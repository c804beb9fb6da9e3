//! Crate-level error type.
//!
//! Scheduling outcomes (validation reports, per-occurrence conflicts,
//! edit violations) are ordinary values. `TimetableError` is reserved for
//! operations that cannot proceed: malformed input, refused mutations,
//! missing records and storage failures.

use thiserror::Error;

use crate::editing::EditViolation;
use crate::validation::ValidationReport;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised by timetable operations.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// A clock time could not be parsed as `HH:MM`.
    #[error("invalid time '{value}': expected HH:MM (24h)")]
    InvalidTime { value: String },

    /// The configuration failed validation and generation was refused.
    #[error("configuration is invalid: {}", summarize_errors(.0))]
    InvalidConfiguration(ValidationReport),

    /// No entry with the given id exists in the edited timetable.
    #[error("timetable entry not found: {0}")]
    EntryNotFound(String),

    /// A proposed edit violated one or more constraints.
    #[error("edit rejected: {}", join_violations(.0))]
    EditRejected(Vec<EditViolation>),

    /// No saved timetable with the given id exists.
    #[error("saved timetable not found: {0}")]
    TimetableNotFound(String),

    /// The storage backend is unusable (e.g. a poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),

    /// File access failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON could not be read or written.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TimetableError {
    /// Violations carried by an [`TimetableError::EditRejected`] error.
    pub fn violations(&self) -> &[EditViolation] {
        match self {
            TimetableError::EditRejected(v) => v,
            _ => &[],
        }
    }
}

fn summarize_errors(report: &ValidationReport) -> String {
    report
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_violations(violations: &[EditViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
