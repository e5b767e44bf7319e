//! # incdeps: C/C++ include dependency graphs
//!
//! incdeps catalogs the C/C++ sources and headers under a scan root, resolves
//! their `#include` directives against an ordered list of include-search
//! roots, and stores the resulting graph as JSON Lines. The stored graph
//! answers "which files are affected if this file changes?" by walking the
//! reverse (`used_by`) edges.
//!
//! ## Pipeline
//!
//! 1. **Catalog** ([`catalog`]): recursive walk, literal suffix filter,
//!    regex blacklist; each surviving file gets a [`FileId`].
//! 2. **Resolve** ([`resolver`]): one directive per line, first include root
//!    that names a cataloged file wins; unresolved names are external headers.
//! 3. **Graph** ([`DependencyGraph`]): mirrored `includes`/`used_by` edges.
//! 4. **Store** ([`store`]): atomic JSONL artifact, strict loading.
//!
//! ## Quick Start
//!
//! ```no_run
//! use incdeps::Config;
//! use std::path::Path;
//!
//! # async fn example() -> incdeps::Result<()> {
//! let config = Config::new("/path/to/source/files", "/path/to/output.jsonl")
//!     .with_include_roots(["/path/to/source"]);
//!
//! let stats = incdeps::build_dependency_tree(&config).await?;
//! println!("{} files, {} edges", stats.files_retained, stats.includes_resolved);
//!
//! let affected = incdeps::who_is_using(
//!     Path::new("/path/to/source/files"),
//!     Path::new("/path/to/output.jsonl"),
//!     Path::new("/path/to/source/files/foo.hpp"),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
mod error;
mod graph;
mod parallel;
pub mod resolver;
pub mod store;
mod types;

pub use catalog::{Blacklist, FileCatalog};
pub use config::{Config, ConfigFile};
pub use error::{Error, ErrorKind, QueryError, Result};
pub use graph::{DependencyGraph, FileNode};
pub use resolver::IncludeResolver;
pub use types::{BuildStats, FileId};

use std::path::{Path, PathBuf};

use tracing::info;

/// Build the graph for `config` and write it to `config.output`.
///
/// The artifact is replaced atomically; if the build fails, nothing is
/// written and any previous artifact stays as it was.
///
/// # Errors
///
/// Returns [`Error::Config`], [`Error::Io`] or [`Error::Read`] from the
/// build, or [`Error::Io`] if the artifact cannot be written.
pub async fn build_dependency_tree(config: &Config) -> Result<BuildStats> {
    let (graph, stats) = DependencyGraph::build(config)?;
    store::save(&graph, &config.output).await?;
    info!(
        output = %config.output.display(),
        files = stats.files_retained,
        "Dependency graph written"
    );
    Ok(stats)
}

/// Load the graph at `output` and list every file that transitively
/// includes `filename`, starting with `filename` itself.
///
/// # Errors
///
/// - [`Error::Io`] or [`Error::Decode`] if the artifact cannot be loaded
/// - [`Error::InvalidQuery`] if `filename` is outside `scan_path` or was
///   never cataloged
pub async fn who_is_using(scan_path: &Path, output: &Path, filename: &Path) -> Result<Vec<PathBuf>> {
    // Reject before touching the artifact.
    if !filename.starts_with(scan_path) {
        return Err(QueryError::OutsideScanRoot {
            path: filename.to_path_buf(),
            scan_root: scan_path.to_path_buf(),
        }
        .into());
    }
    let graph = store::load_file(output).await?;
    graph.reverse_dependents(scan_path, filename)
}
