//! JSON Lines reading and writing for ORKG graph snapshots.
//!
//! Graph snapshots are stored one record per line. Loading is resilient: a
//! corrupt line is reported as a [`Warning`] and skipped so the rest of the
//! graph still loads. Saving is atomic: records are written to a sibling
//! temporary file that is renamed over the target once fully flushed.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::{JsonlReader, read_jsonl_resilient};
pub use warning::Warning;
pub use writer::JsonlWriter;
