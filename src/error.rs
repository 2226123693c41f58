//! Error hierarchy for the out-of-core container.
//!
//! Precondition violations (out-of-range index, `at`/`first`/`last` on an
//! empty container) are deliberately **not** represented here — per the
//! design, those are programmer errors and the implementation panics
//! rather than returning a value the caller could silently ignore.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HugeContainerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode value: {0}")]
    Encode(String),

    #[error("Failed to decode value: {0}")]
    Decode(String),

    /// An index-file record decoded to a structurally invalid frame. This
    /// can only happen if an external process touched the backing files —
    /// the container never produces an invalid frame itself.
    #[error("Corrupt index record at slot {index}: {detail}")]
    CorruptIndex { index: u64, detail: String },

    #[cfg(feature = "sql-backend")]
    #[error("SQL backend error: {0}")]
    Sql(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, HugeContainerError>;
