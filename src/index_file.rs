//! Fixed-stride persistent array of [`Frame`] records.
//!
//! `size() == byte_length(IndexFile) / FRAME_SIZE` is the sole source of
//! truth for the container's element count — there is no separate counter
//! to keep in sync.

use crate::codec::{read_frame, write_frame, Frame, FRAME_SIZE};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

pub struct IndexFile {
    file: File,
}

impl IndexFile {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Number of live elements: `byte_length / FRAME_SIZE`.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len() / FRAME_SIZE as u64)
    }

    pub fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn read_at(&mut self, index: u64) -> io::Result<Frame> {
        let prior = self.file.stream_position()?;
        self.file.seek(SeekFrom::Start(index * FRAME_SIZE as u64))?;
        let frame = read_frame(&mut self.file)?;
        self.file.seek(SeekFrom::Start(prior))?;
        Ok(frame)
    }

    pub fn append(&mut self, frame: &Frame) -> io::Result<()> {
        self.file.seek(SeekFrom::End(0))?;
        write_frame(&mut self.file, frame)
    }

    pub fn overwrite_at(&mut self, index: u64, frame: &Frame) -> io::Result<()> {
        let prior = self.file.stream_position()?;
        self.file.seek(SeekFrom::Start(index * FRAME_SIZE as u64))?;
        write_frame(&mut self.file, frame)?;
        self.file.seek(SeekFrom::Start(prior))?;
        Ok(())
    }

    pub fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.file.set_len(len)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Relocate the tail `[src_index*S, end)` to start at `dst_index*S`,
    /// streaming through a scratch buffer `chunk_size` bytes at a time so
    /// the whole index is never loaded into RAM at once. After the copy,
    /// the file's logical length is adjusted exactly once.
    ///
    /// Used to open a slot for `insert` (`dst_index = src_index + 1`) or to
    /// close a gap on `remove_at` (`dst_index = src_index - 1`, called with
    /// `src_index` one past the removed element).
    pub fn shift(&mut self, src_index: u64, dst_index: u64, chunk_size: usize) -> io::Result<()> {
        log::trace!(
            target: "huge-container",
            "IndexFile::shift tail at slot {src_index} -> slot {dst_index}"
        );
        let stride = FRAME_SIZE as u64;
        let total_len = self.file.metadata()?.len();
        let src_byte = src_index * stride;
        if src_byte > total_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("shift source offset {src_byte} exceeds index length {total_len}"),
            ));
        }
        let tail_len = total_len - src_byte;
        let dst_byte = dst_index * stride;
        let new_len = dst_byte + tail_len;

        if tail_len > 0 {
            if dst_byte > src_byte {
                // Growing (insert): copy back-to-front so we never overwrite
                // bytes we haven't read yet.
                let mut remaining = tail_len;
                let mut buf = vec![0u8; chunk_size.max(1)];
                while remaining > 0 {
                    let take = (remaining as usize).min(buf.len());
                    let read_at = src_byte + remaining - take as u64;
                    let write_at = dst_byte + remaining - take as u64;
                    self.file.seek(SeekFrom::Start(read_at))?;
                    self.file.read_exact(&mut buf[..take])?;
                    self.file.seek(SeekFrom::Start(write_at))?;
                    self.file.write_all(&buf[..take])?;
                    remaining -= take as u64;
                }
            } else {
                // Shrinking (remove) or no-op: copy front-to-back.
                let mut offset = 0u64;
                let mut buf = vec![0u8; chunk_size.max(1)];
                while offset < tail_len {
                    let take = ((tail_len - offset) as usize).min(buf.len());
                    self.file.seek(SeekFrom::Start(src_byte + offset))?;
                    self.file.read_exact(&mut buf[..take])?;
                    self.file.seek(SeekFrom::Start(dst_byte + offset))?;
                    self.file.write_all(&buf[..take])?;
                    offset += take as u64;
                }
            }
        }

        self.file.set_len(new_len)?;
        self.file.seek(SeekFrom::Start(0))?;
        Ok(())
    }

    /// Stream the full contents of `self` into `dst`, `chunk_size` bytes at
    /// a time. Used by [`crate::shared_state::SharedState::deep_clone`].
    pub fn stream_into(&mut self, dst: &mut IndexFile, chunk_size: usize) -> io::Result<u64> {
        self.file.seek(SeekFrom::Start(0))?;
        dst.file.seek(SeekFrom::Start(0))?;
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut total = 0u64;
        loop {
            let n = self.file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            dst.file.write_all(&buf[..n])?;
            total += n as u64;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempfile;

    fn new_index_file() -> IndexFile {
        IndexFile::new(tempfile().unwrap())
    }

    fn f(offset: i64, size: i64) -> Frame {
        Frame { offset, size }
    }

    #[test]
    fn append_and_read_at_round_trip() {
        let mut idx = new_index_file();
        idx.append(&f(0, 8)).unwrap();
        idx.append(&f(8, 16)).unwrap();
        idx.append(&f(24, 4)).unwrap();
        assert_eq!(idx.len().unwrap(), 3);
        assert_eq!(idx.read_at(0).unwrap(), f(0, 8));
        assert_eq!(idx.read_at(1).unwrap(), f(8, 16));
        assert_eq!(idx.read_at(2).unwrap(), f(24, 4));
    }

    #[test]
    fn is_empty_reflects_record_count() {
        let mut idx = new_index_file();
        assert!(idx.is_empty().unwrap());
        idx.append(&f(0, 8)).unwrap();
        assert!(!idx.is_empty().unwrap());
        idx.truncate(0).unwrap();
        assert!(idx.is_empty().unwrap());
    }

    #[test]
    fn overwrite_at_replaces_a_single_slot() {
        let mut idx = new_index_file();
        idx.append(&f(0, 8)).unwrap();
        idx.append(&f(8, 16)).unwrap();
        idx.overwrite_at(0, &f(99, 99)).unwrap();
        assert_eq!(idx.read_at(0).unwrap(), f(99, 99));
        assert_eq!(idx.read_at(1).unwrap(), f(8, 16));
    }

    #[test]
    fn shift_for_insert_opens_a_slot() {
        let mut idx = new_index_file();
        idx.append(&f(0, 1)).unwrap();
        idx.append(&f(1, 1)).unwrap();
        idx.append(&f(2, 1)).unwrap();
        // Open a slot at index 1 for insert: shift [1,end) -> [2,end).
        idx.shift(1, 2, 7).unwrap();
        idx.overwrite_at(1, &f(100, 1)).unwrap();
        assert_eq!(idx.len().unwrap(), 4);
        assert_eq!(idx.read_at(0).unwrap(), f(0, 1));
        assert_eq!(idx.read_at(1).unwrap(), f(100, 1));
        assert_eq!(idx.read_at(2).unwrap(), f(1, 1));
        assert_eq!(idx.read_at(3).unwrap(), f(2, 1));
    }

    #[test]
    fn shift_for_remove_closes_a_gap() {
        let mut idx = new_index_file();
        idx.append(&f(0, 1)).unwrap();
        idx.append(&f(1, 1)).unwrap();
        idx.append(&f(2, 1)).unwrap();
        // Remove index 0: shift [1,end) -> [0,end).
        idx.shift(1, 0, 3).unwrap();
        assert_eq!(idx.len().unwrap(), 2);
        assert_eq!(idx.read_at(0).unwrap(), f(1, 1));
        assert_eq!(idx.read_at(1).unwrap(), f(2, 1));
    }

    #[test]
    fn shift_with_small_chunk_size_still_correct() {
        let mut idx = new_index_file();
        for i in 0..50i64 {
            idx.append(&f(i, 1)).unwrap();
        }
        idx.shift(10, 11, 5).unwrap();
        idx.overwrite_at(10, &f(-5, 5)).unwrap();
        assert_eq!(idx.len().unwrap(), 51);
        assert_eq!(idx.read_at(9).unwrap(), f(9, 1));
        assert_eq!(idx.read_at(10).unwrap(), f(-5, 5));
        assert_eq!(idx.read_at(11).unwrap(), f(10, 1));
        assert_eq!(idx.read_at(50).unwrap(), f(49, 1));
    }

    #[test]
    fn stream_into_copies_every_record() {
        let mut src = new_index_file();
        for i in 0..30i64 {
            src.append(&f(i, i + 1)).unwrap();
        }
        let mut dst = new_index_file();
        let copied = src.stream_into(&mut dst, 17).unwrap();
        assert_eq!(copied, 30 * FRAME_SIZE as u64);
        assert_eq!(dst.len().unwrap(), 30);
        for i in 0..30u64 {
            assert_eq!(dst.read_at(i).unwrap(), f(i as i64, i as i64 + 1));
        }
    }

    #[test]
    fn remove_last_element_shrinks_cleanly() {
        let mut idx = new_index_file();
        idx.append(&f(0, 1)).unwrap();
        idx.append(&f(1, 1)).unwrap();
        // Remove index 1 (the last element): shift [2,end) -> [1,end), i.e. a no-op copy.
        idx.shift(2, 1, 4).unwrap();
        assert_eq!(idx.len().unwrap(), 1);
        assert_eq!(idx.read_at(0).unwrap(), f(0, 1));
    }
}
