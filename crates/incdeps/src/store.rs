//! Graph persistence.
//!
//! A graph is stored as JSON Lines: one record per node, in id order, with
//! the fields `file`, `includes` and `used_by`. A node's id is its line
//! position (blank lines aside), so the file round-trips exactly.
//!
//! ```text
//! {"file":"a.h","includes":[],"used_by":[1]}
//! {"file":"b.h","includes":[0],"used_by":[2]}
//! {"file":"c.cpp","includes":[1],"used_by":[]}
//! ```
//!
//! Loading is all-or-nothing: any malformed line or broken invariant fails
//! the load with [`Error::Decode`](crate::Error::Decode).

use std::io::Cursor;
use std::path::Path;

use incdeps_jsonl::{JsonlReader, JsonlWriter, write_jsonl_atomic};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{DependencyGraph, FileNode};

/// Write `graph` as JSONL records to `writer` and flush it.
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub async fn persist<W: AsyncWrite + Unpin>(graph: &DependencyGraph, writer: W) -> Result<()> {
    let mut writer = JsonlWriter::new(writer);
    writer.write_all(graph.nodes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Serialize `graph` to bytes.
///
/// # Errors
///
/// See [`persist`].
pub async fn to_bytes(graph: &DependencyGraph) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    persist(graph, &mut buffer).await?;
    Ok(buffer.into_inner())
}

/// Read a graph from JSONL records.
///
/// # Errors
///
/// Returns [`Error::Decode`] for malformed records or inconsistent edges and
/// [`Error::Io`] if reading fails.
pub async fn load<R: AsyncRead + Unpin>(reader: R) -> Result<DependencyGraph> {
    let nodes: Vec<FileNode> = JsonlReader::new(reader).read_all().await?;
    DependencyGraph::from_nodes(nodes)
}

/// Deserialize a graph from bytes.
///
/// # Errors
///
/// See [`load`].
pub async fn from_bytes(bytes: &[u8]) -> Result<DependencyGraph> {
    load(bytes).await
}

/// Replace the artifact at `path` with `graph`.
///
/// The parent directory is created if needed. The write goes through a
/// temporary sibling file, so on failure the previous artifact is untouched.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory or file cannot be written.
pub async fn save(graph: &DependencyGraph, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("cannot create output directory {}: {e}", parent.display()),
            ))
        })?;
    }
    write_jsonl_atomic(path, graph.nodes()).await?;
    debug!(path = %path.display(), files = graph.len(), "Saved dependency graph");
    Ok(())
}

/// Load the artifact at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, otherwise see [`load`].
pub async fn load_file(path: &Path) -> Result<DependencyGraph> {
    let file = File::open(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open dependency graph {}: {e}", path.display()),
        ))
    })?;
    let graph = load(file).await?;
    debug!(path = %path.display(), files = graph.len(), "Loaded dependency graph");
    Ok(graph)
}
