//! Error types for incdeps operations.
//!
//! Every error is fatal for the operation that raised it: a build either
//! completes and writes one artifact, or fails and writes nothing.
//!
//! ## Error Categorization
//!
//! [`ErrorKind`] groups the variants the way callers need to react to them:
//! - I/O problems: unreadable directories or sources, unwritable output
//! - Decode problems: a persisted graph that is malformed
//! - Rejected queries: the queried file is outside the scan root or unknown
//! - Configuration problems: bad blacklist patterns, bad config files

use std::path::PathBuf;
use thiserror::Error;

/// Result type for incdeps operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for incdeps operations.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cataloged source file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The persisted graph is malformed
    #[error("decode error: {0}")]
    Decode(String),

    /// The query was rejected
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

/// Reasons a reverse-dependency query is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The queried path does not lie under the scan root
    #[error("{} is outside the scan root {}", path.display(), scan_root.display())]
    OutsideScanRoot {
        /// The queried path
        path: PathBuf,
        /// The scan root the graph was built from
        scan_root: PathBuf,
    },

    /// The queried path lies under the scan root but has no node in the graph
    #[error("{} has not been scanned", path.display())]
    NotInGraph {
        /// The queried path
        path: PathBuf,
    },
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File system failure
    Io,
    /// Malformed persisted graph
    Decode,
    /// Rejected query
    InvalidQuery,
    /// Invalid configuration
    Config,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O error"),
            Self::Decode => write!(f, "decode error"),
            Self::InvalidQuery => write!(f, "invalid query"),
            Self::Config => write!(f, "configuration error"),
        }
    }
}

impl Error {
    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) | Self::Read { .. } => ErrorKind::Io,
            Self::Decode(_) => ErrorKind::Decode,
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Create a read error for a cataloged file.
    #[must_use]
    pub fn read(path: PathBuf, source: std::io::Error) -> Self {
        Self::Read { path, source }
    }
}

impl From<incdeps_jsonl::Error> for Error {
    fn from(error: incdeps_jsonl::Error) -> Self {
        match error {
            incdeps_jsonl::Error::Io(e) => Self::Io(e),
            other => Self::Decode(other.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Config(error.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(error: regex::Error) -> Self {
        Self::Config(error.to_string())
    }
}
