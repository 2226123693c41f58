//! The logical, in-memory slot: either a value already decoded and resident
//! in memory, or a [`Frame`] identifying where it lives in the DataFile.
//!
//! This is a plain tagged sum rather than the source's bit-flag-plus-union:
//! ownership of a resident value belongs to the slot outright, and `Clone`
//! on a `Resident` slot produces a deep copy of the value, never a second
//! reference to it.

use crate::codec::{BlockCodec, Frame};
use crate::data_file::DataFile;
use crate::error::{HugeContainerError, Result};

#[derive(Debug, Clone)]
pub enum Slot<V> {
    /// Value is not in memory; `Frame` names its bytes in the DataFile.
    OnDisk(Frame),
    /// Value is in memory, exclusively owned by this slot.
    Resident(V),
}

impl<V: BlockCodec + Clone> Slot<V> {
    pub fn on_disk(frame: Frame) -> Self {
        Slot::OnDisk(frame)
    }

    pub fn resident(value: V) -> Self {
        Slot::Resident(value)
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, Slot::Resident(_))
    }

    /// Materialize the value, decoding from `data_file` if this slot is
    /// `OnDisk`. Does not mutate `self` — callers that want to cache the
    /// decoded value are responsible for replacing the slot themselves.
    pub fn value(&self, data_file: &mut DataFile) -> Result<V> {
        match self {
            Slot::Resident(v) => Ok(v.clone()),
            Slot::OnDisk(frame) => {
                let bytes = data_file.read(frame.offset, frame.size)?;
                V::decode(&mut &bytes[..]).map_err(|e| HugeContainerError::Decode(e.to_string()))
            }
        }
    }
}
