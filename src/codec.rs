//! Value serialization and the on-disk Frame encoding.
//!
//! # Frame layout (16 bytes, little-endian)
//!
//! ```text
//! Offset  Size  Field
//!    0      8   offset   i64, byte offset into DataFile
//!    8      8   size     i64, length in bytes
//! ```
//!
//! `offset >= 0 && size > 0` for any live frame. `(-1, -1)` is the sentinel
//! for "write failed" and is never written into an IndexFile.
//!
//! Byte order is little-endian and frozen for the lifetime of a container —
//! there is no negotiation and no version field, matching the rest of this
//! crate's binary formats.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Fixed encoded width of a [`Frame`] — the IndexFile's record stride `S`.
pub const FRAME_SIZE: usize = 16;

/// A `(offset, size)` pair naming a byte range within the DataFile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub offset: i64,
    pub size: i64,
}

impl Frame {
    /// Sentinel meaning "write failed" — never entered into an IndexFile.
    pub const INVALID: Frame = Frame { offset: -1, size: -1 };

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.offset >= 0 && self.size > 0
    }
}

/// Write a [`Frame`] in the fixed 16-byte little-endian layout.
pub fn write_frame<W: Write>(mut w: W, frame: &Frame) -> io::Result<()> {
    w.write_i64::<LittleEndian>(frame.offset)?;
    w.write_i64::<LittleEndian>(frame.size)?;
    Ok(())
}

/// Read a [`Frame`] from the fixed 16-byte little-endian layout.
pub fn read_frame<R: Read>(mut r: R) -> io::Result<Frame> {
    let offset = r.read_i64::<LittleEndian>()?;
    let size = r.read_i64::<LittleEndian>()?;
    Ok(Frame { offset, size })
}

/// The capability the container requires of its element type: a value that
/// can be default-constructed, cheaply copied, and encoded/decoded to a
/// byte block. Encoding size need not be fixed across values.
pub trait BlockCodec: Sized {
    /// Encode `self` to `w`. Errors are surfaced as
    /// [`crate::error::HugeContainerError::Encode`] by callers.
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<()>;

    /// Decode a value previously written by [`BlockCodec::encode`].
    fn decode<R: Read>(r: &mut R) -> io::Result<Self>;
}

macro_rules! impl_block_codec_float {
    ($ty:ty, $read:ident, $write:ident) => {
        impl BlockCodec for $ty {
            fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
                w.$write::<LittleEndian>(*self)
            }
            fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
                r.$read::<LittleEndian>()
            }
        }
    };
}

macro_rules! impl_block_codec_int {
    ($ty:ty, $read:ident, $write:ident) => {
        impl BlockCodec for $ty {
            fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
                w.$write::<LittleEndian>(*self)
            }
            fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
                r.$read::<LittleEndian>()
            }
        }
    };
}

impl_block_codec_float!(f64, read_f64, write_f64);
impl_block_codec_float!(f32, read_f32, write_f32);
impl_block_codec_int!(i64, read_i64, write_i64);
impl_block_codec_int!(i32, read_i32, write_i32);
impl_block_codec_int!(u64, read_u64, write_u64);
impl_block_codec_int!(u32, read_u32, write_u32);

impl BlockCodec for bool {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(*self as u8)
    }
    fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(r.read_u8()? != 0)
    }
}

/// Length-prefixed UTF-8 string: `u32` byte length, then the raw bytes.
impl BlockCodec for String {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let bytes = self.as_bytes();
        w.write_u32::<LittleEndian>(bytes.len() as u32)?;
        w.write_all(bytes)
    }
    fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
        let len = r.read_u32::<LittleEndian>()? as usize;
        let mut buf = vec![0u8; len];
        r.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Length-prefixed byte blob: `u32` byte length, then the raw bytes.
impl BlockCodec for Vec<u8> {
    fn encode<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.len() as u32)?;
        w.write_all(self)
    }
    fn decode<R: Read>(r: &mut R) -> io::Result<Self> {
        let len = r.read_u32::<LittleEndian>()? as usize;
        let mut buf = vec![0u8; len];
        r.read_exact(&mut buf)?;
        Ok(buf)
    }
}
