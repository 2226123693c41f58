//! Append-only byte store for encoded element blocks.
//!
//! No header, no per-block length prefix — lengths are recovered from the
//! IndexFile. `append` never overwrites existing bytes; `read` restores the
//! prior file position so a single thread's interleaved append/read calls
//! remain composable.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

pub struct DataFile {
    file: File,
}

impl DataFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Append `block` at the current logical end of the file. Returns the
    /// offset at which writing began.
    pub fn append(&mut self, block: &[u8]) -> io::Result<i64> {
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(block)?;
        log::trace!(target: "huge-container", "DataFile::append at {offset} ({} bytes)", block.len());
        Ok(offset as i64)
    }

    /// Read exactly `size` bytes starting at `offset`, then restore the
    /// file's prior position.
    pub fn read(&mut self, offset: i64, size: i64) -> io::Result<Vec<u8>> {
        let prior = self.file.stream_position()?;
        self.file.seek(SeekFrom::Start(offset as u64))?;
        let mut buf = vec![0u8; size as usize];
        self.file.read_exact(&mut buf)?;
        self.file.seek(SeekFrom::Start(prior))?;
        log::trace!(target: "huge-container", "DataFile::read at {offset} ({size} bytes)");
        Ok(buf)
    }

    pub fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Stream the full contents of `self` into `dst`, `chunk_size` bytes at
    /// a time, without loading the file whole. Used by
    /// [`crate::shared_state::SharedState::deep_clone`].
    pub fn stream_into(&mut self, dst: &mut DataFile, chunk_size: usize) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(0))?;
        dst.file.seek(SeekFrom::Start(0))?;
        let copied = io::copy(&mut LimitedChunked { inner: &mut self.file, chunk_size }, &mut dst.file)?;
        Ok(copied)
    }
}

/// Adapter that forces `io::copy` to move data through `chunk_size`-sized
/// reads instead of whatever default buffer size `io::copy` would otherwise
/// pick, so deep-clone's memory footprint is bounded and predictable.
struct LimitedChunked<'a> {
    inner: &'a mut File,
    chunk_size: usize,
}

impl Read for LimitedChunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.chunk_size);
        self.inner.read(&mut buf[..n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempfile;

    fn new_data_file() -> DataFile {
        DataFile::new(tempfile().unwrap())
    }

    #[test]
    fn append_then_read_back() {
        let mut df = new_data_file();
        let off1 = df.append(b"hello").unwrap();
        let off2 = df.append(b"world!").unwrap();
        assert_eq!(off1, 0);
        assert_eq!(off2, 5);
        assert_eq!(df.read(off1, 5).unwrap(), b"hello");
        assert_eq!(df.read(off2, 6).unwrap(), b"world!");
    }

    #[test]
    fn read_does_not_disturb_append_position() {
        let mut df = new_data_file();
        df.append(b"aaaa").unwrap();
        df.read(0, 4).unwrap();
        let off = df.append(b"bbbb").unwrap();
        assert_eq!(off, 4);
    }

    #[test]
    fn truncate_resets_length() {
        let mut df = new_data_file();
        df.append(b"some bytes").unwrap();
        assert!(df.len().unwrap() > 0);
        df.truncate(0).unwrap();
        assert_eq!(df.len().unwrap(), 0);
        assert!(df.is_empty().unwrap());
    }

    #[test]
    fn stream_into_copies_all_bytes_in_chunks() {
        let mut src = new_data_file();
        let payload = vec![7u8; 5000];
        src.append(&payload).unwrap();

        let mut dst = new_data_file();
        let copied = src.stream_into(&mut dst, 1024).unwrap();
        assert_eq!(copied, 5000);
        assert_eq!(dst.read(0, 5000).unwrap(), payload);
    }
}
