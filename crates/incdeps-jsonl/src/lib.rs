//! Async JSONL (JSON Lines) record storage.
//!
//! This library provides buffered reading and writing of JSONL formatted
//! records plus crash-safe whole-file replacement. It is the persistence layer
//! for incdeps dependency graphs: one record per line, read back in order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{JsonlReader, read_jsonl};
pub use writer::JsonlWriter;
