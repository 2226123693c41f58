//! Owns the two backing files for a container: the DataFile and the
//! IndexFile. This is the unit that [`crate::container::Container`]
//! reference-counts and clones on write.

use crate::config::Config;
use crate::data_file::DataFile;
use crate::index_file::IndexFile;
use std::io;
use tempfile::{Builder, TempPath};

pub struct SharedState {
    pub data_file: DataFile,
    pub index_file: IndexFile,
    // Held only for their Drop impl, which unlinks the backing file. Never
    // read after construction.
    _data_path: TempPath,
    _index_path: TempPath,
}

impl SharedState {
    /// Create a fresh SharedState: two new, empty, opened temporary files
    /// named `{file_prefix}{random suffix}` in `config.temp_dir()`.
    pub fn new(config: &Config) -> io::Result<Self> {
        let dir = config.temp_dir();
        let (data_file, data_path) = new_backing_file(&dir, &config.file_prefix)?;
        let (index_file, index_path) = new_backing_file(&dir, &config.file_prefix)?;
        log::debug!(
            target: "huge-container",
            "SharedState::new data={:?} index={:?}", data_path, index_path
        );
        Ok(Self {
            data_file: DataFile::new(data_file),
            index_file: IndexFile::new(index_file),
            _data_path: data_path,
            _index_path: index_path,
        })
    }

    /// Construct a new SharedState and stream both of `self`'s backing
    /// files into it, `config.stream_chunk_size` bytes at a time, starting
    /// at offset 0. Used for copy-on-write detach.
    pub fn deep_clone(&mut self, config: &Config) -> io::Result<Self> {
        let mut clone = Self::new(config)?;
        let data_bytes = self
            .data_file
            .stream_into(&mut clone.data_file, config.stream_chunk_size)?;
        let index_bytes = self
            .index_file
            .stream_into(&mut clone.index_file, config.stream_chunk_size)?;
        log::debug!(
            target: "huge-container",
            "SharedState::deep_clone streamed {data_bytes} data bytes, {index_bytes} index bytes"
        );
        Ok(clone)
    }
}

fn new_backing_file(dir: &std::path::Path, prefix: &str) -> io::Result<(std::fs::File, TempPath)> {
    let named = Builder::new().prefix(prefix).tempfile_in(dir)?;
    let (file, path) = named.into_parts();
    Ok((file, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_empty_files() {
        let config = Config::default();
        let state = SharedState::new(&config).unwrap();
        assert_eq!(state.data_file.len().unwrap(), 0);
        assert_eq!(state.index_file.len().unwrap(), 0);
    }

    #[test]
    fn deep_clone_copies_both_files_independently() {
        let config = Config::default();
        let mut state = SharedState::new(&config).unwrap();
        state.data_file.append(b"payload").unwrap();
        state
            .index_file
            .append(&crate::codec::Frame { offset: 0, size: 7 })
            .unwrap();

        let mut clone = state.deep_clone(&config).unwrap();
        assert_eq!(clone.data_file.read(0, 7).unwrap(), b"payload");
        assert_eq!(clone.index_file.len().unwrap(), 1);

        // Mutating the clone must not affect the source.
        clone.data_file.append(b"more").unwrap();
        assert_eq!(state.data_file.len().unwrap(), 7);
        assert_eq!(clone.data_file.len().unwrap(), 11);
    }

    #[test]
    fn backing_files_are_removed_on_drop() {
        let config = Config::default();
        let state = SharedState::new(&config).unwrap();
        let data_path = state._data_path.to_path_buf();
        assert!(data_path.exists());
        drop(state);
        assert!(!data_path.exists());
    }
}
