//! Registry Module
//!
//! Name-indexed file lifecycle.
//!
//! ## Responsibilities
//! - Create files with an initial empty block
//! - Find live files by name (creation order, deleted files skipped)
//! - Unlink files on delete, destroying them once no session holds them
//! - Own the block allocator so every chain is returned to it on destruction
//!
//! ## Storage
//! Files live in an arena (`Vec<Option<File>>`) addressed by `FileId`.
//! A separate creation-ordered list holds the ids visible to name lookup.
//! Deleted-but-open files stay in the arena only, so sessions keep a valid
//! id while `find` can no longer see them.

mod file;

pub use file::{File, FileId};

use tracing::debug;

use crate::block::{BlockAllocator, BlockChain};
use crate::error::{Result, UfsError};

/// All files known to an engine
#[derive(Debug)]
pub struct FileRegistry {
    /// File arena; `None` marks a reusable slot
    slots: Vec<Option<File>>,

    /// Arena slots free for reuse
    free_slots: Vec<usize>,

    /// Live files in creation order
    live: Vec<FileId>,

    allocator: BlockAllocator,
}

impl FileRegistry {
    pub fn new(allocator: BlockAllocator) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            live: Vec::new(),
            allocator,
        }
    }

    /// Find the live file called `name`
    pub fn find(&self, name: &str) -> Option<FileId> {
        self.live.iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|file| !file.is_deleted() && file.name() == name)
        })
    }

    /// Create a new live file with one empty block.
    ///
    /// Every allocation happens before the file is linked anywhere, so a
    /// failure leaves the registry unchanged.
    pub fn create(&mut self, name: &str) -> Result<FileId> {
        let mut owned_name = String::new();
        owned_name.try_reserve_exact(name.len())?;
        owned_name.push_str(name);

        self.live.try_reserve(1)?;
        if self.free_slots.is_empty() {
            self.slots.try_reserve(1)?;
        }

        let head = self.allocator.allocate()?;
        let file = File::new(owned_name, BlockChain::new(head));

        let id = match self.free_slots.pop() {
            Some(index) => {
                self.slots[index] = Some(file);
                FileId(index)
            }
            None => {
                self.slots.push(Some(file));
                FileId(self.slots.len() - 1)
            }
        };
        self.live.push(id);

        debug!(file = id.index(), name, "Created file");
        Ok(id)
    }

    /// Unlink the live file called `name`.
    ///
    /// The file is destroyed right away when no session holds it; otherwise
    /// it is kept, flagged deleted, until its last session is released.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let id = self.find(name).ok_or(UfsError::FileNotFound)?;
        self.live.retain(|live| *live != id);

        let Some(file) = self.get_mut(id) else {
            return Err(UfsError::FileNotFound);
        };
        file.mark_deleted();

        if file.is_orphaned() {
            self.destroy(id);
        } else {
            debug!(file = id.index(), name, refs = file.refs(), "File unlinked, retained for open sessions");
        }
        Ok(())
    }

    /// Record one more session on `id`
    pub fn retain(&mut self, id: FileId) {
        if let Some(file) = self.get_mut(id) {
            file.retain();
        }
    }

    /// Drop one session from `id`, destroying the file if it was the last
    /// reference to a deleted file
    pub fn release(&mut self, id: FileId) {
        let orphaned = match self.get_mut(id) {
            Some(file) => {
                file.release();
                file.is_orphaned()
            }
            None => false,
        };
        if orphaned {
            self.destroy(id);
        }
    }

    pub fn get(&self, id: FileId) -> Option<&File> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FileId) -> Option<&mut File> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Borrow a file together with the allocator, for writes that grow it
    pub fn file_and_allocator(&mut self, id: FileId) -> Option<(&mut File, &mut BlockAllocator)> {
        let file = self.slots.get_mut(id.0).and_then(Option::as_mut)?;
        Some((file, &mut self.allocator))
    }

    /// Physically free every file, live or retained
    pub fn destroy_all(&mut self) {
        let count = self.slots.iter().filter(|slot| slot.is_some()).count();
        self.slots.clear();
        self.free_slots.clear();
        self.live.clear();
        self.allocator.reset();
        debug!(files = count, "Destroyed all files");
    }

    /// Number of files visible to name lookup
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of deleted files still held open
    pub fn retained_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|file| file.is_deleted())
            .count()
    }

    /// Names of live files in creation order
    pub fn names(&self) -> Vec<&str> {
        self.live
            .iter()
            .filter_map(|id| self.get(*id))
            .map(File::name)
            .collect()
    }

    pub fn allocator(&self) -> &BlockAllocator {
        &self.allocator
    }

    fn destroy(&mut self, id: FileId) {
        if let Some(file) = self.slots.get_mut(id.0).and_then(Option::take) {
            debug!(file = id.index(), name = file.name(), blocks = file.chain().len(), "Destroyed file");
            self.allocator.reclaim(file.into_chain());
            self.free_slots.push(id.0);
        }
    }
}
