//! File records
//!
//! A named file owning its block chain.

use crate::block::BlockChain;

/// Stable index of a file inside the registry arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub(crate) usize);

impl FileId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// A file and its contents
#[derive(Debug)]
pub struct File {
    name: String,
    chain: BlockChain,

    /// Open sessions referencing this file
    refs: usize,

    /// Unlinked from name lookup, kept alive for open sessions
    deleted: bool,
}

impl File {
    pub(crate) fn new(name: String, chain: BlockChain) -> Self {
        Self {
            name,
            chain,
            refs: 0,
            deleted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain(&self) -> &BlockChain {
        &self.chain
    }

    pub(crate) fn chain_mut(&mut self) -> &mut BlockChain {
        &mut self.chain
    }

    pub fn refs(&self) -> usize {
        self.refs
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.chain.size()
    }

    pub(crate) fn into_chain(self) -> BlockChain {
        self.chain
    }

    pub(crate) fn retain(&mut self) {
        self.refs += 1;
    }

    pub(crate) fn release(&mut self) {
        self.refs = self.refs.saturating_sub(1);
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    /// Nothing can reach this file any more
    pub(crate) fn is_orphaned(&self) -> bool {
        self.deleted && self.refs == 0
    }
}
