//! Engine Module
//!
//! The storage engine facade that coordinates all components.
//!
//! ## Responsibilities
//! - Open files by name, creating them on request
//! - Route reads and writes through descriptor sessions to block chains
//! - Close descriptors and delete files with reference-counted teardown
//! - Keep the last error of any failed operation for later inspection

use tracing::{debug, trace, warn};

use crate::block::BlockAllocator;
use crate::config::Config;
use crate::descriptor::{DescriptorTable, Fd};
use crate::error::{Result, UfsError};
use crate::registry::FileRegistry;

/// How `open` treats a missing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Fail with `FileNotFound` if the file does not exist
    Existing,

    /// Create the file if it does not exist
    Create,
}

/// Snapshot of an open descriptor and the file behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,

    /// File size in bytes
    pub size: usize,

    /// Number of blocks in the chain
    pub blocks: usize,

    /// `occupied` of every block, head first
    pub occupancy: Vec<usize>,

    /// Open sessions on the file
    pub refs: usize,

    /// Whether the file was deleted while still open
    pub deleted: bool,

    /// Cursor of the queried descriptor
    pub pos: usize,
}

/// The in-memory file system
///
/// ## Lifecycle
/// `new` (empty) → open/read/write/close/delete → `destroy_all` → drop.
///
/// Every operation runs to completion on the caller's thread and takes
/// `&mut self`; wrap the engine in [`crate::SharedEngine`] to share it.
/// A failing operation returns its error and also stores it as the
/// engine's last error. Successful operations leave the last error as is.
#[derive(Debug)]
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Files by name, plus the block allocator
    registry: FileRegistry,

    /// Open descriptors
    descriptors: DescriptorTable,

    /// Most recent failure
    last_error: Option<UfsError>,
}

impl Engine {
    /// Create an empty engine with the given config
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let allocator = BlockAllocator::new(config.block_size, config.block_limit);
        let registry = FileRegistry::new(allocator);
        let descriptors = DescriptorTable::new(config.initial_descriptor_capacity);

        debug!(
            block_size = config.block_size,
            max_file_size = config.max_file_size,
            "Engine initialized"
        );

        Ok(Self {
            config,
            registry,
            descriptors,
            last_error: None,
        })
    }

    /// Open `name`, returning a new descriptor with its cursor at 0
    pub fn open(&mut self, name: &str, mode: OpenMode) -> Result<Fd> {
        let result = self.open_internal(name, mode);
        self.record(result)
    }

    /// Write `bytes` at the descriptor's cursor and advance it.
    ///
    /// Returns the number of bytes written. If block allocation fails or
    /// the file reaches its size ceiling part way through, the bytes already
    /// written are kept and their count is returned, with `OutOfMemory`
    /// recorded as the last error. If nothing could be written for that
    /// reason the call fails with `OutOfMemory`.
    pub fn write(&mut self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        let result = self.write_internal(fd, bytes);
        self.record(result)
    }

    /// Read up to `max` bytes from the descriptor's cursor and advance it.
    ///
    /// Returns an empty vector at end of file.
    pub fn read(&mut self, fd: Fd, max: usize) -> Result<Vec<u8>> {
        let result = self.read_internal(fd, max);
        self.record(result)
    }

    /// Read into `buf` from the descriptor's cursor, returning the count
    pub fn read_into(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let result = self.read_into_internal(fd, buf);
        self.record(result)
    }

    /// Close a descriptor.
    ///
    /// Closing the last descriptor on a deleted file frees the file.
    pub fn close(&mut self, fd: Fd) -> Result<()> {
        let result = self.close_internal(fd);
        self.record(result)
    }

    /// Delete the live file called `name`.
    ///
    /// The name becomes free immediately; open descriptors keep working on
    /// the old contents until they are closed.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let result = self.registry.delete(name);
        self.record(result)
    }

    /// Move the descriptor's cursor back to the start of the file
    pub fn rewind(&mut self, fd: Fd) -> Result<()> {
        let result = self.descriptors.resolve_mut(fd).map(|session| session.pos = 0);
        self.record(result)
    }

    /// Resizing files is not supported
    pub fn resize(&mut self, fd: Fd, new_size: usize) -> Result<()> {
        let result = self
            .descriptors
            .resolve(fd)
            .and_then(|_| Err(UfsError::NotImplemented));
        trace!(fd, new_size, "Resize requested");
        self.record(result)
    }

    /// Describe the descriptor and its file
    pub fn stat(&mut self, fd: Fd) -> Result<FileStat> {
        let result = self.stat_internal(fd);
        self.record(result)
    }

    /// Free every file and every descriptor, open or not.
    ///
    /// All descriptors become invalid. The engine stays usable afterwards.
    pub fn destroy_all(&mut self) {
        let open = self.descriptors.open_count();
        self.descriptors.clear();
        self.registry.destroy_all();
        debug!(open_descriptors = open, "Engine torn down");
    }

    /// The most recent error, `None` if no operation has failed yet
    pub fn last_error(&self) -> Option<UfsError> {
        self.last_error.clone()
    }

    /// Forget the last error
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of files visible to `open`
    pub fn live_file_count(&self) -> usize {
        self.registry.live_count()
    }

    /// Number of deleted files kept alive by open descriptors
    pub fn retained_file_count(&self) -> usize {
        self.registry.retained_count()
    }

    /// Names of live files in creation order
    pub fn file_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn open_descriptor_count(&self) -> usize {
        self.descriptors.open_count()
    }

    pub fn descriptor_capacity(&self) -> usize {
        self.descriptors.capacity()
    }

    /// Number of blocks allocated across all files
    pub fn blocks_in_use(&self) -> usize {
        self.registry.allocator().in_use()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.last_error = Some(e.clone());
        }
        result
    }

    fn open_internal(&mut self, name: &str, mode: OpenMode) -> Result<Fd> {
        if name.is_empty() {
            return Err(UfsError::FileNotFound);
        }

        let id = match (self.registry.find(name), mode) {
            (Some(id), _) => id,
            (None, OpenMode::Create) => self.registry.create(name)?,
            (None, OpenMode::Existing) => return Err(UfsError::FileNotFound),
        };

        let fd = self.descriptors.acquire(id)?;
        self.registry.retain(id);

        debug!(fd, name, "Opened descriptor");
        Ok(fd)
    }

    fn write_internal(&mut self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        let max_blocks = self.config.max_blocks_per_file();

        let session = self.descriptors.resolve_mut(fd)?;
        let (file, allocator) = self
            .registry
            .file_and_allocator(session.file)
            .ok_or(UfsError::BadHandle)?;

        let outcome = file
            .chain_mut()
            .write_at(session.pos, bytes, allocator, max_blocks);
        session.pos += outcome.written;

        trace!(fd, requested = bytes.len(), written = outcome.written, pos = session.pos, "Write");

        match outcome.error {
            None => Ok(outcome.written),
            Some(e) if outcome.written > 0 => {
                warn!(fd, written = outcome.written, requested = bytes.len(), error = %e, "Short write");
                self.last_error = Some(e);
                Ok(outcome.written)
            }
            Some(e) => {
                warn!(fd, requested = bytes.len(), error = %e, "Write failed");
                Err(e)
            }
        }
    }

    fn read_internal(&mut self, fd: Fd, max: usize) -> Result<Vec<u8>> {
        let session = self.descriptors.resolve(fd)?;
        let file = self.registry.get(session.file).ok_or(UfsError::BadHandle)?;

        // Never size the buffer beyond what is left in the file
        let len = max.min(file.size().saturating_sub(session.pos));
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)?;
        buf.resize(len, 0u8);

        let n = self.read_into_internal(fd, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    fn read_into_internal(&mut self, fd: Fd, buf: &mut [u8]) -> Result<usize> {
        let session = self.descriptors.resolve_mut(fd)?;
        let file = self.registry.get(session.file).ok_or(UfsError::BadHandle)?;

        let n = file.chain().read_at(session.pos, buf);
        session.pos += n;

        trace!(fd, requested = buf.len(), read = n, pos = session.pos, "Read");
        Ok(n)
    }

    fn close_internal(&mut self, fd: Fd) -> Result<()> {
        let session = self.descriptors.release(fd)?;
        self.registry.release(session.file);
        debug!(fd, "Closed descriptor");
        Ok(())
    }

    fn stat_internal(&self, fd: Fd) -> Result<FileStat> {
        let session = self.descriptors.resolve(fd)?;
        let file = self.registry.get(session.file).ok_or(UfsError::BadHandle)?;

        Ok(FileStat {
            name: file.name().to_string(),
            size: file.size(),
            blocks: file.chain().len(),
            occupancy: file.chain().occupancy(),
            refs: file.refs(),
            deleted: file.is_deleted(),
            pos: session.pos,
        })
    }
}
