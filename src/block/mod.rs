//! Block Module
//!
//! Fixed-capacity storage units and the chains that make up file contents.
//!
//! ## Responsibilities
//! - Hold file bytes in equally sized blocks
//! - Walk a chain by byte offset for reads and writes
//! - Grow a chain one block at a time, only when a full tail must take more bytes
//! - Fail allocation cleanly (no half-linked block) when memory or budget runs out
//!
//! ## Chain Layout
//! ```text
//!  offset:   0            C            2C           2C+k
//!            ┌────────────┬────────────┬──────┬─────┐
//!            │  block 0   │  block 1   │ blk 2│free │
//!            │ occupied=C │ occupied=C │ =k   │     │
//!            └────────────┴────────────┴──────┴─────┘
//!  block index = offset / C, in-block offset = offset % C
//! ```
//! Every block except the tail is exactly full.

mod allocator;
mod chain;

pub use allocator::BlockAllocator;
pub use chain::{BlockChain, WriteOutcome};

/// One fixed-capacity storage unit
#[derive(Debug)]
pub struct Block {
    /// Backing buffer, always `capacity` bytes long
    data: Box<[u8]>,

    /// High-water mark of valid bytes
    occupied: usize,
}

impl Block {
    pub(crate) fn from_buffer(data: Box<[u8]>) -> Self {
        Self { data, occupied: 0 }
    }

    /// Total capacity in bytes
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of valid bytes
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.data.len()
    }

    /// The valid region of the block
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.occupied]
    }

    /// Copy as much of `bytes` as fits starting at `offset`.
    ///
    /// Raises `occupied` to the end of the copied range if it was lower.
    /// Returns the number of bytes copied.
    fn write_at(&mut self, offset: usize, bytes: &[u8]) -> usize {
        if offset >= self.data.len() {
            return 0;
        }
        let n = bytes.len().min(self.data.len() - offset);
        self.data[offset..offset + n].copy_from_slice(&bytes[..n]);
        self.occupied = self.occupied.max(offset + n);
        n
    }

    /// Copy valid bytes starting at `offset` into `buf`.
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        if offset >= self.occupied {
            return 0;
        }
        let n = buf.len().min(self.occupied - offset);
        buf[..n].copy_from_slice(&self.data[offset..offset + n]);
        n
    }
}
