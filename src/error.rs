//! Error types for sexpdb

use thiserror::Error;

/// Result type alias for sexpdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sexpdb operations
///
/// Looking up an unknown id is not an error: reads return `None` or a zero
/// weight instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error at byte {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Seed mismatch: backend seed {expected}, data built with seed {found}")]
    SeedMismatch { expected: String, found: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            offset,
            message: message.into(),
        }
    }
}
