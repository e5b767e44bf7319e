//! Error types for incdeps-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for incdeps-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line could not be deserialized into the requested record type.
    #[error("line {line_number}: {source}")]
    Parse {
        /// The 1-based line number of the offending line.
        line_number: usize,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid JSONL format.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

impl Error {
    /// Returns `true` if the error was caused by malformed input rather than I/O.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::InvalidFormat(_))
    }
}

/// A specialized Result type for incdeps-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
