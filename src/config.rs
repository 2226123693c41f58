//! Constructor-time knobs for a [`Container`](crate::container::Container).
//!
//! This library is embedded, not run standalone, so configuration is plain
//! constructor arguments rather than an environment/file parsing layer.

use std::path::PathBuf;

/// Default chunk size used when streaming bytes between backing files
/// (deep-clone on detach, index-file shift). 1 KiB, per the design.
pub const DEFAULT_STREAM_CHUNK_SIZE: usize = 1024;

/// Prefix every backing file name begins with, so [`crate::cleanup::run`]
/// can recognize and sweep them.
pub const DEFAULT_FILE_PREFIX: &str = "HugeContainerData";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory backing files are created in. `None` means
    /// `std::env::temp_dir()`.
    pub temp_dir: Option<PathBuf>,
    /// Chunk size used by `deep_clone` and `IndexFile::shift` when streaming
    /// bytes between files.
    pub stream_chunk_size: usize,
    /// Prefix for backing file names.
    pub file_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            temp_dir: None,
            stream_chunk_size: DEFAULT_STREAM_CHUNK_SIZE,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl Config {
    pub fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
