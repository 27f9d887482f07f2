//! Block allocator
//!
//! Hands out zeroed blocks and keeps count of how many are alive.

use crate::error::{Result, UfsError};

use super::{Block, BlockChain};

/// Allocates blocks of one fixed size
///
/// Allocation fails with `OutOfMemory` when the optional block budget is
/// spent or the buffer cannot be reserved. A failed allocation leaves no
/// state behind.
#[derive(Debug)]
pub struct BlockAllocator {
    block_size: usize,
    block_limit: Option<usize>,
    in_use: usize,
}

impl BlockAllocator {
    pub fn new(block_size: usize, block_limit: Option<usize>) -> Self {
        Self {
            block_size,
            block_limit,
            in_use: 0,
        }
    }

    /// Allocate one empty block
    pub fn allocate(&mut self) -> Result<Block> {
        if let Some(limit) = self.block_limit {
            if self.in_use >= limit {
                return Err(UfsError::OutOfMemory);
            }
        }

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(self.block_size)?;
        buffer.resize(self.block_size, 0u8);

        self.in_use += 1;
        Ok(Block::from_buffer(buffer.into_boxed_slice()))
    }

    /// Return every block of a chain to the allocator
    pub fn reclaim(&mut self, chain: BlockChain) {
        self.in_use = self.in_use.saturating_sub(chain.len());
    }

    /// Return a single block that never made it into a chain
    pub fn reclaim_block(&mut self, block: Block) {
        drop(block);
        self.in_use = self.in_use.saturating_sub(1);
    }

    /// Forget every outstanding block (used by engine teardown)
    pub fn reset(&mut self) {
        self.in_use = 0;
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks currently alive
    pub fn in_use(&self) -> usize {
        self.in_use
    }
}
