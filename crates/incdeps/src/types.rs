//! Core types shared across the catalog, resolver and graph.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identity of a cataloged file: its index in catalog order.
///
/// Assigned once per build; the same tree scanned twice yields the same ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(usize);

impl FileId {
    /// Create an id from a catalog index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The catalog index this id refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for FileId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Statistics from a build.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Files under the scan root with an allowed extension
    pub files_discovered: usize,
    /// Discovered files excluded by a blacklist pattern
    pub files_blacklisted: usize,
    /// Files that became graph nodes
    pub files_retained: usize,
    /// Include directives found across all retained files
    pub includes_found: usize,
    /// Directives bound to a retained file (one edge each)
    pub includes_resolved: usize,
    /// Time taken
    pub duration: Duration,
}

impl BuildStats {
    /// Directives that matched no include root (system or external headers).
    #[must_use]
    pub fn includes_unresolved(&self) -> usize {
        self.includes_found - self.includes_resolved
    }
}
