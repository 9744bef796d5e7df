//! Core error types for saiyan-core.
//!
//! Every failure is recoverable: an operation that returns an error has not
//! mutated any state, so callers can report and carry on.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for saiyan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid user input; the operation was a no-op.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Undo requested on an empty ledger.
    #[error("no {domain} logs to undo")]
    EmptyHistory { domain: &'static str },

    /// Malformed import payload; prior state is untouched.
    #[error("invalid import file: {0}")]
    ImportFormat(String),

    /// Export requested with an unrecognized format identifier.
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// Configuration load/save failures.
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage-related errors
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation errors for user-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Training minutes must be strictly positive
    #[error("training minutes must be a positive number")]
    NonPositiveMinutes,

    /// Ki points must be strictly positive
    #[error("ki amount must be a positive number")]
    NonPositiveKi,

    /// Supplement name is empty after trimming
    #[error("supplement name must not be empty")]
    EmptySupplementName,
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// Data directory could not be resolved or created
    #[error("data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
