//! Atomic write operations for JSONL files.
//!
//! Writes go to a temporary sibling file which is flushed, synced and then
//! renamed over the target. On POSIX systems a rename within one filesystem is
//! atomic, so readers see either the previous artifact or the complete new one,
//! never a truncated file.
//!
//! # Examples
//!
//! ```no_run
//! use incdeps_jsonl::write_jsonl_atomic;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Record {
//!     id: u32,
//!     name: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = vec![
//!     Record { id: 1, name: "a.h".to_string() },
//!     Record { id: 2, name: "b.h".to_string() },
//! ];
//!
//! write_jsonl_atomic("graph.jsonl", &records).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::File;
use tracing::{debug, warn};

use crate::{JsonlWriter, Result};

/// Atomically writes a slice of values to a JSONL file.
///
/// # Errors
///
/// Returns an error if:
/// - The temporary file cannot be created
/// - Any value fails to serialize
/// - An I/O error occurs during writing
/// - The atomic rename fails (e.g., cross-filesystem move)
///
/// On failure, the original file (if it exists) is left unchanged and the
/// temporary file is removed on a best-effort basis.
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Atomically writes an iterator of values to a JSONL file.
///
/// This is the iterator form of [`write_jsonl_atomic`], useful when the
/// records are produced lazily.
///
/// # Errors
///
/// See [`write_jsonl_atomic`] for error conditions.
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    let records = match write_to_temp_file(&temp_path, values).await {
        Ok(records) => records,
        Err(e) => {
            discard_temp_file(&temp_path).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        discard_temp_file(&temp_path).await;
        return Err(e.into());
    }

    debug!(path = %path.display(), records, "Replaced JSONL file");
    Ok(())
}

/// Creates the temporary path used while writing `path`.
///
/// `.tmp` is appended to the full file name, so `graph.jsonl` becomes
/// `graph.jsonl.tmp` and `graph` becomes `graph.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

/// Writes values to a temporary file and syncs it; returns the record count.
async fn write_to_temp_file<T, I>(temp_path: &Path, values: I) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    let records = writer.records_written();
    writer.into_inner().into_inner().sync_all().await?;
    Ok(records)
}

async fn discard_temp_file(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %temp_path.display(), error = %e, "Failed to remove temporary file");
        }
    }
}
