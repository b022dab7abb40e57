//! Custom error types for tally-chart
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. The chart engine itself only ever produces
//! `Validation` errors; the remaining variants belong to the snapshot adapters
//! and the command line front end.

use thiserror::Error;

/// The main error type for tally-chart operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Rejected chart parameters or malformed records
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TallyError {
    /// Create a "not found" error for snapshot files
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TallyError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for tally-chart operations
pub type TallyResult<T> = Result<T, TallyError>;
