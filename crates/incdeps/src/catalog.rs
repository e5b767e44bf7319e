//! Source file discovery.
//!
//! The catalog walks the scan root, keeps files whose names end with an
//! allowed suffix, drops anything matching the blacklist, and numbers the
//! survivors. The number is the file's [`FileId`] for the rest of the build.
//!
//! ## Ordering
//!
//! Directory entries are visited in byte order of their names, so scanning
//! the same tree twice yields the same list and the same ids.
//!
//! ## File names
//!
//! Cataloged paths must be valid UTF-8, since they are stored as JSON
//! strings. A matching file whose path is not fails the scan.
//!
//! ## Known limitation
//!
//! Symlinks are followed with no loop detection. A directory symlink that
//! points at one of its ancestors is descended repeatedly until the OS
//! refuses to resolve the path (`ELOOP`). At that depth the entry no longer
//! reports as a directory, so it is tested as a file name and normally
//! skipped. The walk ends without an error, but files inside the loop are
//! cataloged once per level.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::FileId;

/// Recursively list files under `root` whose names end with an allowed suffix.
///
/// The match is a literal, case-sensitive suffix test on the file name: `.hpp`
/// matches `a.hpp` but not `a.xhpp`, while `hpp` matches both.
///
/// # Errors
///
/// Returns [`Error::Io`] naming the directory if any directory under `root`
/// cannot be read, or naming the file if a matching file's path is not valid
/// UTF-8.
pub fn scan(root: &Path, allowed_extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_dir(root, allowed_extensions, &mut files)?;
    Ok(files)
}

fn walk_dir(dir: &Path, allowed_extensions: &[String], files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .and_then(|entries| entries.collect::<std::io::Result<Vec<_>>>())
        .map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot read directory {}: {e}", dir.display()),
            ))
        })?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, allowed_extensions, files)?;
        } else if has_allowed_extension(&path, allowed_extensions) {
            if path.to_str().is_none() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("file path is not valid UTF-8: {}", path.display()),
                )));
            }
            files.push(path);
        }
    }

    Ok(())
}

/// Literal suffix test on the file name.
fn has_allowed_extension(path: &Path, allowed_extensions: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    allowed_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Compiled blacklist patterns.
///
/// Each pattern is searched (unanchored) in the full path after `\` has been
/// replaced by `/`.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    patterns: Vec<Regex>,
}

impl Blacklist {
    /// Compile the given patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first pattern that fails to compile.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| {
                    Error::Config(format!("invalid blacklist pattern '{}': {e}", p.as_ref()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Returns `true` if any pattern matches the normalized path.
    #[must_use]
    pub fn is_blacklisted(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let normalized = path.to_string_lossy().replace('\\', "/");
        self.patterns.iter().any(|p| p.is_match(&normalized))
    }

    /// Number of compiled patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if there are no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The numbered list of files that become graph nodes.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
    files: Vec<PathBuf>,
    ids: HashMap<PathBuf, FileId>,
    discovered: usize,
}

impl FileCatalog {
    /// Scan `root`, filter by blacklist and assign ids in scan order.
    ///
    /// # Errors
    ///
    /// See [`scan`].
    pub fn build(root: &Path, allowed_extensions: &[String], blacklist: &Blacklist) -> Result<Self> {
        let discovered = scan(root, allowed_extensions)?;
        info!(count = discovered.len(), "Potential source files");

        let catalog = Self::from_paths(root, discovered, blacklist);
        info!(
            count = catalog.len(),
            blacklisted = catalog.blacklisted(),
            "Non-blacklisted source files"
        );
        Ok(catalog)
    }

    /// Number the given paths, dropping blacklisted ones.
    pub fn from_paths(root: &Path, paths: Vec<PathBuf>, blacklist: &Blacklist) -> Self {
        let discovered = paths.len();
        let mut files = Vec::with_capacity(discovered);
        let mut ids = HashMap::with_capacity(discovered);

        for path in paths {
            if blacklist.is_blacklisted(&path) {
                debug!(path = %path.display(), "Blacklisted");
                continue;
            }
            let id = FileId::new(files.len());
            ids.entry(path.clone()).or_insert(id);
            files.push(path);
        }

        Self {
            root: root.to_path_buf(),
            files,
            ids,
            discovered,
        }
    }

    /// The scan root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Retained files in id order.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of retained files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file was retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Files found before blacklist filtering.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.discovered
    }

    /// Files removed by the blacklist.
    #[must_use]
    pub fn blacklisted(&self) -> usize {
        self.discovered - self.files.len()
    }

    /// Look up a retained file by path (component-wise comparison).
    #[must_use]
    pub fn id_of(&self, path: &Path) -> Option<FileId> {
        self.ids.get(path).copied()
    }

    /// Path of a retained file.
    #[must_use]
    pub fn path_of(&self, id: FileId) -> Option<&Path> {
        self.files.get(id.index()).map(PathBuf::as_path)
    }

    /// Path of a retained file relative to the root, `/`-separated.
    #[must_use]
    pub fn relative_path(&self, id: FileId) -> Option<String> {
        self.path_of(id).map(|path| relative_to(&self.root, path))
    }
}

/// `path` relative to `root` with components joined by `/`.
///
/// Falls back to the whole path when `path` is not under `root`.
pub(crate) fn relative_to(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
