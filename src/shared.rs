//! Shared engine handle
//!
//! Serializes every operation behind one exclusive lock so an [`Engine`]
//! can be used from several threads.
//!
//! ## Concurrency Model
//! - One `parking_lot::Mutex` guards the registry, the descriptor table and
//!   the last error together
//! - Each call holds the lock for its whole duration, so every operation
//!   sees the effects of all operations that completed before it
//! - Writes through different descriptors on the same file interleave in
//!   lock-acquisition order; no other ordering is promised

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::descriptor::Fd;
use crate::engine::{Engine, FileStat, OpenMode};
use crate::error::{Result, UfsError};

/// Cloneable, thread-safe handle to one engine
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<Engine>>,
}

impl SharedEngine {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::from_engine(Engine::new(config)?))
    }

    pub fn from_engine(engine: Engine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn open(&self, name: &str, mode: OpenMode) -> Result<Fd> {
        self.inner.lock().open(name, mode)
    }

    pub fn write(&self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        self.inner.lock().write(fd, bytes)
    }

    pub fn read(&self, fd: Fd, max: usize) -> Result<Vec<u8>> {
        self.inner.lock().read(fd, max)
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        self.inner.lock().close(fd)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.inner.lock().delete(name)
    }

    pub fn rewind(&self, fd: Fd) -> Result<()> {
        self.inner.lock().rewind(fd)
    }

    pub fn stat(&self, fd: Fd) -> Result<FileStat> {
        self.inner.lock().stat(fd)
    }

    pub fn destroy_all(&self) {
        self.inner.lock().destroy_all()
    }

    pub fn last_error(&self) -> Option<UfsError> {
        self.inner.lock().last_error()
    }

    /// Lock the engine for a sequence of operations that must not interleave
    /// with other callers
    pub fn lock(&self) -> MutexGuard<'_, Engine> {
        self.inner.lock()
    }
}
