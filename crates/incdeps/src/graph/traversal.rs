//! Queries over a built or restored graph.
//!
//! All queries take `&self`. Reverse reachability tracks visited nodes in a
//! set local to the call, so a graph can be queried any number of times and
//! from several threads at once.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use super::DependencyGraph;
use crate::catalog::relative_to;
use crate::error::{QueryError, Result};
use crate::types::FileId;

impl DependencyGraph {
    /// Every file that transitively includes the file at `target`.
    ///
    /// `target` itself comes first, followed by the other files in
    /// breadth-first discovery order over `used_by`. Paths are `scan_root`
    /// joined with each node's relative path.
    ///
    /// # Errors
    ///
    /// - [`QueryError::OutsideScanRoot`] if `target` is not under `scan_root`
    /// - [`QueryError::NotInGraph`] if `target` has no node
    pub fn reverse_dependents(&self, scan_root: &Path, target: &Path) -> Result<Vec<PathBuf>> {
        let id = self.locate(scan_root, target)?;
        Ok(self
            .reverse_dependent_ids(id)
            .into_iter()
            .filter_map(|id| self.absolute_path(scan_root, id))
            .collect())
    }

    /// Id form of [`reverse_dependents`](Self::reverse_dependents).
    ///
    /// Returns an empty list if `target` is not a node.
    #[must_use]
    pub fn reverse_dependent_ids(&self, target: FileId) -> Vec<FileId> {
        if target.index() >= self.nodes.len() {
            return Vec::new();
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut order = vec![target];
        let mut queue = VecDeque::from([target]);
        visited[target.index()] = true;

        while let Some(current) = queue.pop_front() {
            for &dependent in &self.nodes[current.index()].used_by {
                if !visited[dependent.index()] {
                    visited[dependent.index()] = true;
                    order.push(dependent);
                    queue.push_back(dependent);
                }
            }
        }

        order
    }

    /// Find the node for an absolute path under `scan_root`.
    ///
    /// # Errors
    ///
    /// See [`reverse_dependents`](Self::reverse_dependents).
    pub fn locate(&self, scan_root: &Path, target: &Path) -> Result<FileId> {
        if !target.starts_with(scan_root) {
            return Err(QueryError::OutsideScanRoot {
                path: target.to_path_buf(),
                scan_root: scan_root.to_path_buf(),
            }
            .into());
        }
        self.id_of(&relative_to(scan_root, target)).ok_or_else(|| {
            QueryError::NotInGraph {
                path: target.to_path_buf(),
            }
            .into()
        })
    }

    /// Files that include `id` directly, in build order, without duplicates.
    #[must_use]
    pub fn direct_dependents(&self, id: FileId) -> Vec<FileId> {
        self.node(id)
            .map(|node| dedup_in_order(&node.used_by))
            .unwrap_or_default()
    }

    /// Files `id` includes directly, in directive order, without duplicates.
    #[must_use]
    pub fn direct_includes(&self, id: FileId) -> Vec<FileId> {
        self.node(id)
            .map(|node| dedup_in_order(&node.includes))
            .unwrap_or_default()
    }

    /// Files with the most transitive dependents, highest first.
    ///
    /// Ties are broken by id. Files nothing includes are left out.
    #[must_use]
    pub fn most_used(&self, limit: usize) -> Vec<(FileId, usize)> {
        let mut ranked: Vec<(FileId, usize)> = (0..self.nodes.len())
            .filter(|&index| !self.nodes[index].used_by.is_empty())
            .map(|index| {
                let id = FileId::new(index);
                (id, self.reverse_dependent_ids(id).len() - 1)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}

fn dedup_in_order(ids: &[FileId]) -> Vec<FileId> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
