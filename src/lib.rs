//! # userfs
//!
//! An in-memory file system living entirely inside one process:
//! - Named files stored as chains of fixed-size blocks
//! - Integer file descriptors with per-descriptor cursors
//! - Reference-counted deletion (deleted files live on while open)
//! - Short writes instead of aborts when memory runs out
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                               │
//! │     open / read / write / close / delete / destroy_all       │
//! │                     (last error)                             │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!   ┌─────────────────────────┐     ┌─────────────────────────┐
//!   │    Descriptor Table     │     │      File Registry      │
//!   │  fd → Session{file,pos} │────▶│  name → File (arena)    │
//!   └─────────────────────────┘     └────────────┬────────────┘
//!                                                │
//!                                                ▼
//!                                   ┌─────────────────────────┐
//!                                   │       Block Chain       │
//!                                   │ [C][C][C]..[k] + alloc  │
//!                                   └─────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod block;
pub mod registry;
pub mod descriptor;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{UfsError, Result};
pub use config::Config;
pub use descriptor::Fd;
pub use engine::{Engine, FileStat, OpenMode};
pub use shared::SharedEngine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of userfs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
