//! Descriptor table implementation
//!
//! Dense slot vector with reuse of closed slots.

use tracing::debug;

use crate::error::{Result, UfsError};
use crate::registry::FileId;

use super::{Fd, Session};

/// Maps descriptors to open sessions
#[derive(Debug)]
pub struct DescriptorTable {
    /// One entry per descriptor; `None` is a free slot.
    /// `slots.len()` is the table capacity.
    slots: Vec<Option<Session>>,

    /// Capacity used the first time the table is populated
    initial_capacity: usize,
}

impl DescriptorTable {
    /// Create an empty table. Slots are allocated on first `acquire`.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            initial_capacity: initial_capacity.max(1),
        }
    }

    /// Install a fresh session on `file` in the lowest free slot
    pub fn acquire(&mut self, file: FileId) -> Result<Fd> {
        let index = match self.slots.iter().position(Option::is_none) {
            Some(index) => index,
            None => {
                let index = self.slots.len();
                self.grow()?;
                index
            }
        };

        let fd = Fd::try_from(index).map_err(|_| UfsError::OutOfMemory)?;
        self.slots[index] = Some(Session::new(file));
        Ok(fd)
    }

    /// Remove the session behind `fd`, returning it
    pub fn release(&mut self, fd: Fd) -> Result<Session> {
        let index = self.index_of(fd)?;
        self.slots[index].take().ok_or(UfsError::BadHandle)
    }

    pub fn resolve(&self, fd: Fd) -> Result<&Session> {
        let index = self.index_of(fd)?;
        self.slots[index].as_ref().ok_or(UfsError::BadHandle)
    }

    pub fn resolve_mut(&mut self, fd: Fd) -> Result<&mut Session> {
        let index = self.index_of(fd)?;
        self.slots[index].as_mut().ok_or(UfsError::BadHandle)
    }

    /// Drop every session and release the slot storage
    pub fn clear(&mut self) {
        self.slots = Vec::new();
    }

    /// Number of slots currently allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of open sessions
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterate over open descriptors and their sessions
    pub fn iter(&self) -> impl Iterator<Item = (Fd, &Session)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|session| (index as Fd, session)))
    }

    fn index_of(&self, fd: Fd) -> Result<usize> {
        let index = usize::try_from(fd).map_err(|_| UfsError::BadHandle)?;
        if index >= self.slots.len() {
            return Err(UfsError::BadHandle);
        }
        Ok(index)
    }

    /// Double the capacity (or allocate the initial one); new slots are empty
    fn grow(&mut self) -> Result<()> {
        let new_capacity = match self.slots.len() {
            0 => self.initial_capacity,
            len => len.checked_mul(2).ok_or(UfsError::OutOfMemory)?,
        };
        self.slots.try_reserve_exact(new_capacity - self.slots.len())?;
        self.slots.resize_with(new_capacity, || None);

        debug!(capacity = new_capacity, "Grew descriptor table");
        Ok(())
    }
}
