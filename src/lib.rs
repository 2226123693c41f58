//! # huge-container — out-of-core, copy-on-write sequence container
//!
//! A `Container<V>` behaves like an in-memory random-access sequence but
//! keeps its elements in two temporary files on disk rather than in RAM, so
//! a process can hold far more elements than fit comfortably in memory:
//!
//! - The **DataFile** is an append-only store of encoded element blocks.
//! - The **IndexFile** is a fixed-stride array of `(offset, size)` frames,
//!   one per element; its byte length divided by the frame stride is the
//!   container's element count, with no separate counter to keep in sync.
//! - Cloning a `Container` is O(1): clones share backing state until one of
//!   them mutates, at which point that clone detaches by deep-copying both
//!   files. Reads never detach.
//!
//! Element types implement [`BlockCodec`] to describe how they serialize
//! into a DataFile block; implementations are provided for the common
//! scalar types plus `bool`, `String`, and `Vec<u8>`.

pub mod cleanup;
pub mod codec;
pub mod config;
pub mod container;
pub mod data_file;
pub mod error;
pub mod index_file;
pub mod shared_state;
pub mod slot;

#[cfg(feature = "sql-backend")]
pub mod sql_backend;

pub use codec::{BlockCodec, Frame};
pub use config::Config;
pub use container::Container;
pub use error::{HugeContainerError, Result};

#[cfg(feature = "sql-backend")]
pub use sql_backend::SqlSequence;
