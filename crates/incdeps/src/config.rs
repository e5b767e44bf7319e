//! Build configuration.
//!
//! [`Config`] is the fully resolved set of options a build runs with.
//! [`ConfigFile`] is the on-disk YAML form, where every field is optional so
//! command-line flags can fill the gaps.
//!
//! ```yaml
//! scan-path: /path/to/source/files
//! include-roots:
//!   - /path/to/source
//! output: /path/to/output.jsonl
//! blacklist:
//!   - 'sources/others'
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Blacklist;
use crate::error::{Error, Result};

/// File name suffixes cataloged when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".c", ".cpp", ".c++", ".cxx", ".h", ".hpp", ".h++", ".hxx", ".r",
];

/// Directory, relative to the scan root, holding the default artifact.
pub const DEFAULT_OUTPUT_DIR: &str = ".incdeps";

/// File name of the default artifact.
pub const DEFAULT_OUTPUT_FILE: &str = "graph.jsonl";

/// Resolved options for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory to catalog
    pub scan_path: PathBuf,
    /// Include-search roots, first match wins
    pub include_roots: Vec<PathBuf>,
    /// Where the graph artifact is written
    pub output: PathBuf,
    /// Allowed file name suffixes (literal, case-sensitive)
    pub extensions: Vec<String>,
    /// Regex patterns over `/`-normalized paths; matches are excluded
    pub blacklist: Vec<String>,
}

impl Config {
    /// Create a configuration with default extensions, no include roots and
    /// no blacklist.
    pub fn new(scan_path: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            scan_path: scan_path.into(),
            include_roots: Vec::new(),
            output: output.into(),
            extensions: default_extensions(),
            blacklist: Vec::new(),
        }
    }

    /// Replace the include-search roots.
    #[must_use]
    pub fn with_include_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.include_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the allowed extensions.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the blacklist patterns.
    #[must_use]
    pub fn with_blacklist<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Check the configuration and compile the blacklist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no extensions are configured, an extension
    /// is empty, or a blacklist pattern is not a valid regex.
    pub fn validate(&self) -> Result<Blacklist> {
        if self.extensions.is_empty() {
            return Err(Error::Config("no file extensions configured".to_string()));
        }
        if self.extensions.iter().any(String::is_empty) {
            return Err(Error::Config(
                "empty file extension would match every file".to_string(),
            ));
        }
        Blacklist::new(&self.blacklist)
    }
}

/// Default artifact location for a scan root.
#[must_use]
pub fn default_output(scan_path: &Path) -> PathBuf {
    scan_path.join(DEFAULT_OUTPUT_DIR).join(DEFAULT_OUTPUT_FILE)
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect()
}

/// On-disk configuration, every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Root directory to catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_path: Option<PathBuf>,
    /// Include-search roots, first match wins
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_roots: Vec<PathBuf>,
    /// Where the graph artifact is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Allowed file name suffixes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    /// Blacklist regex patterns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blacklist: Vec<String>,
}

impl ConfigFile {
    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid YAML for this schema.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read config file {}: {e}", path.display()),
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed YAML or unknown keys.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
