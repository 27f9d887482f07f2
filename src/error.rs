//! Error types for userfs
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using UfsError
pub type Result<T> = std::result::Result<T, UfsError>;

/// Unified error type for userfs operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UfsError {
    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("File not found")]
    FileNotFound,

    #[error("Bad file descriptor")]
    BadHandle,

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    /// Allocation failed, the block budget is spent, or a file hit its size ceiling
    #[error("Out of memory")]
    OutOfMemory,

    // -------------------------------------------------------------------------
    // Unsupported Operations
    // -------------------------------------------------------------------------
    #[error("Operation not implemented")]
    NotImplemented,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

impl From<std::collections::TryReserveError> for UfsError {
    fn from(_: std::collections::TryReserveError) -> Self {
        UfsError::OutOfMemory
    }
}
