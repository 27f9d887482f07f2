//! Block chain
//!
//! Ordered sequence of blocks holding one file's bytes, plus the
//! positional read/write algorithms over it.

use crate::error::{Result, UfsError};

use super::{Block, BlockAllocator};

/// Result of a write that may stop early
///
/// `written` bytes are committed even when `error` is set; the chain is
/// fully linked either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Bytes copied into the chain
    pub written: usize,

    /// Why the write stopped before consuming all input, if it did
    pub error: Option<UfsError>,
}

impl WriteOutcome {
    fn complete(written: usize) -> Self {
        Self {
            written,
            error: None,
        }
    }

    fn short(written: usize, error: UfsError) -> Self {
        Self {
            written,
            error: Some(error),
        }
    }
}

/// A file's blocks, head first
///
/// Never empty: a chain starts with one (possibly empty) block and only
/// grows at the tail.
#[derive(Debug)]
pub struct BlockChain {
    blocks: Vec<Block>,
    block_size: usize,
}

impl BlockChain {
    /// Start a chain from its first block
    pub fn new(head: Block) -> Self {
        let block_size = head.capacity();
        Self {
            blocks: vec![head],
            block_size,
        }
    }

    /// Number of blocks in the chain
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn head(&self) -> Option<&Block> {
        self.blocks.first()
    }

    pub fn tail(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Total valid bytes in the chain
    pub fn size(&self) -> usize {
        match self.blocks.last() {
            Some(tail) => (self.blocks.len() - 1) * self.block_size + tail.occupied(),
            None => 0,
        }
    }

    /// `occupied` of every block, head first
    pub fn occupancy(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::occupied).collect()
    }

    /// Split a byte offset into (block index, in-block offset)
    pub fn locate(&self, pos: usize) -> (usize, usize) {
        (pos / self.block_size, pos % self.block_size)
    }

    /// Link `block` as the new tail.
    ///
    /// The slot is reserved before the block is moved in, so on failure the
    /// chain is untouched and the caller still owns the block.
    pub fn push(&mut self, block: Block) -> std::result::Result<(), Block> {
        if block.capacity() != self.block_size || self.blocks.try_reserve(1).is_err() {
            return Err(block);
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Read valid bytes starting at `pos` into `buf`.
    ///
    /// Stops at end of data: a block run dry is only left behind when it is
    /// full and has a successor. Returns the number of bytes copied.
    pub fn read_at(&self, pos: usize, buf: &mut [u8]) -> usize {
        let (mut index, mut offset) = self.locate(pos);
        let mut read = 0;

        while read < buf.len() {
            let Some(block) = self.blocks.get(index) else {
                break;
            };

            let n = block.read_at(offset, &mut buf[read..]);
            read += n;
            offset += n;

            if read == buf.len() {
                break;
            }

            // Block exhausted; move on only across a full block boundary
            if offset == self.block_size && index + 1 < self.blocks.len() {
                index += 1;
                offset = 0;
            } else {
                break;
            }
        }

        read
    }

    /// Write `bytes` starting at `pos`, growing the tail as needed.
    ///
    /// A position past the end of the chain writes nothing. The exact end of
    /// a full tail is the append point: a successor block is allocated there
    /// because bytes are about to land in it. Growth stops with
    /// `OutOfMemory` when the chain already holds `max_blocks` blocks or the
    /// allocator refuses; bytes copied before that stay committed.
    pub fn write_at(
        &mut self,
        pos: usize,
        bytes: &[u8],
        allocator: &mut BlockAllocator,
        max_blocks: usize,
    ) -> WriteOutcome {
        let (mut index, mut offset) = self.locate(pos);

        let at_append_point =
            index == self.blocks.len() && offset == 0 && self.tail().is_some_and(Block::is_full);
        if index > self.blocks.len() || (index == self.blocks.len() && !at_append_point) {
            return WriteOutcome::complete(0);
        }

        let mut written = 0;
        while written < bytes.len() {
            if index == self.blocks.len() {
                if let Err(e) = self.grow(allocator, max_blocks) {
                    return WriteOutcome::short(written, e);
                }
            }

            let n = self.blocks[index].write_at(offset, &bytes[written..]);
            written += n;
            offset += n;

            if offset == self.block_size {
                index += 1;
                offset = 0;
            }
        }

        WriteOutcome::complete(written)
    }

    fn grow(&mut self, allocator: &mut BlockAllocator, max_blocks: usize) -> Result<()> {
        if self.blocks.len() >= max_blocks {
            return Err(UfsError::OutOfMemory);
        }
        let block = allocator.allocate()?;
        self.push(block).map_err(|block| {
            allocator.reclaim_block(block);
            UfsError::OutOfMemory
        })
    }
}
