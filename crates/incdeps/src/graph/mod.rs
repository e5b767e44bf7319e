//! The include dependency graph.
//!
//! One [`FileNode`] per cataloged file, indexed by [`FileId`]. Every edge is
//! stored twice: `A.includes` holds `B` exactly as many times as `B.used_by`
//! holds `A`. Duplicate edges (a header included twice) are kept.
//!
//! ## Operations
//!
//! | Operation | Where |
//! |-----------|-------|
//! | Build from a source tree | [`DependencyGraph::build`] |
//! | Restore from records | [`DependencyGraph::from_nodes`] |
//! | Reverse reachability | [`DependencyGraph::reverse_dependents`] |
//! | Direct neighbours, statistics | `traversal` |

mod traversal;

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{FileCatalog, relative_to};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::parallel;
use crate::resolver::IncludeResolver;
use crate::types::{BuildStats, FileId};

/// A file and its edges.
///
/// Field order is the persisted record layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    /// Path relative to the scan root, `/`-separated
    pub file: String,
    /// Files this file includes, in directive order
    pub includes: Vec<FileId>,
    /// Files that include this file, in build order
    pub used_by: Vec<FileId>,
}

impl FileNode {
    fn new(file: String) -> Self {
        Self {
            file,
            includes: Vec::new(),
            used_by: Vec::new(),
        }
    }
}

/// Include dependency graph over one scan root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<FileNode>,
    ids: HashMap<String, FileId>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog the scan root, resolve includes and assemble the graph.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the configuration does not validate
    /// - [`Error::Io`] if a directory cannot be read
    /// - [`Error::Read`] if a cataloged file cannot be read
    pub fn build(config: &Config) -> Result<(Self, BuildStats)> {
        let start = Instant::now();
        let blacklist = config.validate()?;
        info!(scan_path = %config.scan_path.display(), "Listing files to analyse");

        let catalog = FileCatalog::build(&config.scan_path, &config.extensions, &blacklist)?;
        let resolver = IncludeResolver::new(config.include_roots.clone());

        let (graph, mut stats) = Self::from_catalog(&catalog, &resolver)?;
        stats.duration = start.elapsed();
        Ok((graph, stats))
    }

    /// Assemble the graph for an existing catalog.
    ///
    /// Directives are extracted in parallel; edges are added in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if a cataloged file cannot be read.
    pub fn from_catalog(
        catalog: &FileCatalog,
        resolver: &IncludeResolver,
    ) -> Result<(Self, BuildStats)> {
        // Node ids must equal catalog ids, so nodes are pushed rather than
        // merged by name.
        let mut graph = Self::new();
        for (index, path) in catalog.files().iter().enumerate() {
            let file = relative_to(catalog.root(), path);
            graph.ids.entry(file.clone()).or_insert(FileId::new(index));
            graph.nodes.push(FileNode::new(file));
        }

        info!("Reading and parsing all files");
        let parsed = parallel::extract_all(catalog)?;

        let mut stats = BuildStats {
            files_discovered: catalog.discovered(),
            files_blacklisted: catalog.blacklisted(),
            files_retained: catalog.len(),
            ..BuildStats::default()
        };

        for file in parsed {
            stats.includes_found += file.directives.len();
            let mut resolved = 0;
            for directive in &file.directives {
                if let Some(target) = resolver.resolve(&directive.name, catalog) {
                    graph.add_edge(file.file_id, target);
                    resolved += 1;
                }
            }
            stats.includes_resolved += resolved;
            debug!(
                file = graph.nodes[file.file_id.index()].file.as_str(),
                includes = resolved,
                "Resolved includes"
            );
        }

        info!(
            files = graph.len(),
            edges = stats.includes_resolved,
            unresolved = stats.includes_unresolved(),
            "Dependency graph built"
        );
        Ok((graph, stats))
    }

    /// Restore a graph from persisted nodes, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if two nodes share a path, an edge points
    /// outside the node list, or an edge is missing its mirror.
    pub fn from_nodes(nodes: Vec<FileNode>) -> Result<Self> {
        let len = nodes.len();
        let mut ids = HashMap::with_capacity(len);
        for (index, node) in nodes.iter().enumerate() {
            if let Some(previous) = ids.insert(node.file.clone(), FileId::new(index)) {
                return Err(Error::Decode(format!(
                    "duplicate entry for '{}' (records {} and {})",
                    node.file,
                    previous.index() + 1,
                    index + 1
                )));
            }
        }

        // (includer, included) -> includes count minus used_by count
        let mut balance: HashMap<(usize, usize), i64> = HashMap::new();
        for (index, node) in nodes.iter().enumerate() {
            for &target in &node.includes {
                check_in_range(target, len, &node.file)?;
                *balance.entry((index, target.index())).or_default() += 1;
            }
            for &source in &node.used_by {
                check_in_range(source, len, &node.file)?;
                *balance.entry((source.index(), index)).or_default() -= 1;
            }
        }
        if let Some(((from, to), _)) = balance.iter().find(|(_, count)| **count != 0) {
            return Err(Error::Decode(format!(
                "edge '{}' -> '{}' is not mirrored between includes and used_by",
                nodes[*from].file, nodes[*to].file
            )));
        }

        Ok(Self { nodes, ids })
    }

    /// Add a node and return its id.
    ///
    /// Adding a path that is already present returns the existing id.
    pub fn add_file(&mut self, file: impl Into<String>) -> FileId {
        let file = file.into();
        if let Some(&id) = self.ids.get(&file) {
            return id;
        }
        let id = FileId::new(self.nodes.len());
        self.ids.insert(file.clone(), id);
        self.nodes.push(FileNode::new(file));
        id
    }

    /// Record that `from` includes `to`, on both nodes.
    ///
    /// # Panics
    ///
    /// Panics if either id is not a node of this graph.
    pub fn add_edge(&mut self, from: FileId, to: FileId) {
        assert!(
            from.index() < self.nodes.len() && to.index() < self.nodes.len(),
            "edge {from} -> {to} references a missing node"
        );
        self.nodes[from.index()].includes.push(to);
        self.nodes[to.index()].used_by.push(from);
    }

    /// Nodes in id order.
    #[must_use]
    pub fn nodes(&self) -> &[FileNode] {
        &self.nodes
    }

    /// Consume the graph, returning its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<FileNode> {
        self.nodes
    }

    /// The node for `id`.
    #[must_use]
    pub fn node(&self, id: FileId) -> Option<&FileNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node by its relative path.
    #[must_use]
    pub fn id_of(&self, relative_path: &str) -> Option<FileId> {
        self.ids.get(relative_path).copied()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of include edges, duplicates counted.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.includes.len()).sum()
    }

    /// Absolute path of a node under `scan_root`.
    #[must_use]
    pub fn absolute_path(&self, scan_root: &Path, id: FileId) -> Option<std::path::PathBuf> {
        self.node(id).map(|node| {
            node.file
                .split('/')
                .fold(scan_root.to_path_buf(), |path, segment| path.join(segment))
        })
    }
}

fn check_in_range(id: FileId, len: usize, file: &str) -> Result<()> {
    if id.index() < len {
        Ok(())
    } else {
        Err(Error::Decode(format!(
            "'{file}' references file id {} but only {len} files exist",
            id.index()
        )))
    }
}
