//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL files line-by-line
//! with efficient buffering and line number tracking for error reporting.
//!
//! Reading is strict: the first line that fails to deserialize stops the read
//! with [`Error::Parse`](crate::Error::Parse). Blank lines are skipped.

use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::trace;

use crate::{Error, Result};

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and provides buffered reading of JSONL
/// formatted data. It tracks line numbers to provide useful context in error
/// messages when parsing fails.
///
/// # Examples
///
/// ```no_run
/// use incdeps_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("graph.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(record) = reader.read_line::<serde_json::Value>().await? {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
    /// Reusable line buffer.
    buf: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    ///
    /// Line numbering uses 1-based indexing: the counter starts at 0 and increments
    /// after each line is read, so the first line read is numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based line number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads and deserializes the next non-blank line.
    ///
    /// Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the offending line number if the line is
    /// not a valid `T`, [`Error::InvalidFormat`] if the bytes are not UTF-8,
    /// or [`Error::Io`] on read failure.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            self.buf.clear();
            let read = self
                .reader
                .read_line(&mut self.buf)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::InvalidData => Error::InvalidFormat(format!(
                        "line {}: stream did not contain valid UTF-8",
                        self.line_number + 1
                    )),
                    _ => Error::Io(e),
                })?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buf.trim();
            if line.is_empty() {
                trace!(line_number = self.line_number, "Skipping blank line");
                continue;
            }

            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| Error::Parse {
                    line_number: self.line_number,
                    source,
                });
        }
    }

    /// Reads every remaining record, failing on the first malformed line.
    ///
    /// # Errors
    ///
    /// See [`read_line`](Self::read_line).
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_line().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

/// Opens `path` and reads every record in it.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, otherwise see
/// [`JsonlReader::read_line`].
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    JsonlReader::new(file).read_all().await
}
