//! The public sequence handle — the primary embedding surface.
//!
//! ```
//! use huge_container::Container;
//!
//! let mut c: Container<f64> = Container::new().unwrap();
//! c.push_back(1.0).unwrap();
//! c.push_back(2.0).unwrap();
//! c.insert(1, 9.0).unwrap();
//! assert_eq!(c.size(), 3);
//! assert_eq!(c.at(1).unwrap(), 9.0);
//! ```

use crate::codec::{BlockCodec, Frame};
use crate::config::Config;
use crate::error::{HugeContainerError, Result};
use crate::shared_state::SharedState;
use crate::slot::Slot;
use std::cell::RefCell;
use std::io;
use std::marker::PhantomData;
use std::rc::Rc;

/// An out-of-core, copy-on-write sequence of `V`.
///
/// Cloning a `Container` is O(1) and shares the backing state; the first
/// mutation performed through either clone after the share detaches it by
/// deep-copying both backing files.
pub struct Container<V> {
    state: Rc<RefCell<SharedState>>,
    config: Config,
    _marker: PhantomData<V>,
}

impl<V: Default + Clone + BlockCodec> Container<V> {
    /// Create an empty container using [`Config::default`].
    pub fn new() -> io::Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create an empty container with explicit configuration.
    pub fn with_config(config: Config) -> io::Result<Self> {
        let state = SharedState::new(&config)?;
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
            config,
            _marker: PhantomData,
        })
    }

    /// Detach from shared state before a mutating operation: if any other
    /// `Container` shares our `SharedState`, clone it first. Mutators must
    /// call this before touching `self.state`.
    fn detach(&mut self) -> io::Result<()> {
        if Rc::strong_count(&self.state) > 1 {
            let cloned = self.state.borrow_mut().deep_clone(&self.config)?;
            self.state = Rc::new(RefCell::new(cloned));
        }
        Ok(())
    }

    /// Append `value` at the end of the sequence.
    pub fn push_back(&mut self, value: V) -> Result<()> {
        self.detach()?;
        let mut state = self.state.borrow_mut();
        append_value(&mut state.data_file, &mut state.index_file, &value)
    }

    /// Insert `value` at `index`, shifting every element at `index..size`
    /// one slot to the right. `index == size()` behaves as [`Self::push_back`].
    pub fn insert(&mut self, index: u64, value: V) -> Result<()> {
        let size = self.size();
        assert!(
            index <= size,
            "insert index {index} out of bounds for size {size}"
        );
        if index == size {
            return self.push_back(value);
        }
        self.detach()?;
        let mut state = self.state.borrow_mut();

        let mut block = Vec::new();
        value
            .encode(&mut block)
            .map_err(|e| HugeContainerError::Encode(e.to_string()))?;
        let offset = state.data_file.append(&block)?;
        let frame = Frame { offset, size: block.len() as i64 };

        state
            .index_file
            .shift(index, index + 1, self.config.stream_chunk_size)?;
        state.index_file.overwrite_at(index, &frame)?;
        Ok(())
    }

    /// Decode and return the value at `index`.
    pub fn at(&self, index: u64) -> Result<V> {
        let size = self.size();
        assert!(index < size, "index {index} out of bounds for size {size}");
        let mut state = self.state.borrow_mut();
        let frame = state.index_file.read_at(index)?;
        if !frame.is_valid() {
            return Err(HugeContainerError::CorruptIndex {
                index,
                detail: format!("frame {frame:?} does not name a live byte range"),
            });
        }
        let slot: Slot<V> = Slot::on_disk(frame);
        slot.value(&mut state.data_file)
    }

    /// Remove the element at `index`; every element at `index+1..size`
    /// moves down by one. DataFile bytes for the removed element are not
    /// reclaimed until [`Self::clear`].
    pub fn remove_at(&mut self, index: u64) -> Result<()> {
        let size = self.size();
        assert!(index < size, "remove_at index {index} out of bounds for size {size}");
        self.detach()?;
        let mut state = self.state.borrow_mut();
        state
            .index_file
            .shift(index + 1, index, self.config.stream_chunk_size)?;
        Ok(())
    }

    /// Truncate both backing files to empty. A no-op on an already-empty
    /// container.
    pub fn clear(&mut self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        self.detach()?;
        let mut state = self.state.borrow_mut();
        state.data_file.truncate(0)?;
        state.index_file.truncate(0)?;
        Ok(())
    }

    /// Current element count — the IndexFile's byte length divided by the
    /// frame stride, the sole source of truth for size.
    pub fn size(&self) -> u64 {
        self.state
            .borrow()
            .index_file
            .len()
            .expect("index file metadata query failed")
    }

    /// Alias for [`Self::size`].
    pub fn count(&self) -> u64 {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Equivalent to `self.at(0)`. Panics if the container is empty.
    pub fn first(&self) -> Result<V> {
        assert!(!self.is_empty(), "first() called on an empty container");
        self.at(0)
    }

    /// Equivalent to `self.at(size() - 1)`. Panics if the container is empty.
    pub fn last(&self) -> Result<V> {
        let size = self.size();
        assert!(size > 0, "last() called on an empty container");
        self.at(size - 1)
    }

    /// Exchange backing state with `other` in O(1); never allocates.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(&mut self.state, &mut other.state);
        std::mem::swap(&mut self.config, &mut other.config);
    }
}

/// Shared append path used by both `push_back` and (after the index shift)
/// `insert`'s append-then-relocate sequence.
fn append_value<V: BlockCodec>(
    data_file: &mut crate::data_file::DataFile,
    index_file: &mut crate::index_file::IndexFile,
    value: &V,
) -> Result<()> {
    let mut block = Vec::new();
    value
        .encode(&mut block)
        .map_err(|e| HugeContainerError::Encode(e.to_string()))?;
    let offset = data_file.append(&block)?;
    let frame = Frame { offset, size: block.len() as i64 };
    index_file.append(&frame)?;
    Ok(())
}

/// O(1): bumps the shared-state reference count, performs no file I/O.
impl<V> Clone for Container<V> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}
