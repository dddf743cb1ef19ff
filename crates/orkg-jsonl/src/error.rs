//! Error types for orkg-jsonl operations.

use std::io;
use thiserror::Error;

/// Fatal errors raised while reading or writing JSONL data.
///
/// Per-line parse failures during resilient reads are not errors; they are
/// reported as [`crate::Warning`]s.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A value could not be serialized, or a strict read hit bad JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data is not line-delimited JSON.
    #[error("Invalid JSONL format at line {line_number}: {reason}")]
    InvalidFormat {
        /// 1-based line number.
        line_number: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

/// A specialized Result type for orkg-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
