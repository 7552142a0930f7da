use std::io;

use thiserror::Error;

/// Enumerates high-level errors returned by this library.
///
/// None of these escape the core record operations, which degrade to
/// no-ops or empty state instead. They surface from parsing, from the
/// persistence port and from configuration.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Represents a failure to read or write the persistence slot.
    #[error("I/O error")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Represents a snapshot that could not be encoded or decoded.
    #[error("JSON error")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Represents a calendar date not in `YYYY-MM-DD` form.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Represents a status label outside the canonical workflow.
    #[error("Unknown status: {0}")]
    UnknownStatus(String),

    /// Represents a checklist field name that does not exist.
    #[error("Unknown checklist field: {0}")]
    UnknownField(String),

    /// Represents an RMS record type other than the three known ones.
    #[error("Unknown RMS record type: {0}")]
    UnknownRecordType(String),

    /// Represents a priority other than Low, Medium or High.
    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    /// Represents a recording selector other than all, yes or no.
    #[error("Unknown recording filter: {0}")]
    UnknownRecordingFilter(String),

    /// Represents a configuration variable with an unusable value.
    #[error("Invalid value for {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Represents an ID that does not exist in the collection.
    #[error("Non-existent project ID: {0}")]
    NonExistentId(String),
}
