//! Descriptor Module
//!
//! Small-integer handles for open files.
//!
//! ## Responsibilities
//! - Hand out the lowest free slot, reusing closed ones before growing
//! - Grow geometrically (doubling) with every new slot empty
//! - Resolve handles for read/write, rejecting negative, out-of-range and
//!   empty ones with `BadHandle`

mod table;

pub use table::DescriptorTable;

use crate::registry::FileId;

/// File descriptor handed to callers
pub type Fd = i32;

/// State of one open handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// File the handle was opened on (not owned)
    pub file: FileId,

    /// Byte offset of the next read or write
    pub pos: usize,
}

impl Session {
    pub fn new(file: FileId) -> Self {
        Self { file, pos: 0 }
    }
}
