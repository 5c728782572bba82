//! Error types for index operations.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    /// Structurally invalid input to an engine API.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A dataset line or document id the builder cannot use.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// An index file that cannot be decoded. `record` is the zero-based
    /// index of the term record that failed (0 covers the file header).
    #[error("corrupt index at record {record}: {reason}")]
    CorruptIndex { record: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
