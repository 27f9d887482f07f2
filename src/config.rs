//! Configuration for userfs
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, UfsError};

/// Main configuration for an engine instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Block Configuration
    // -------------------------------------------------------------------------
    /// Capacity of a single block in bytes
    pub block_size: usize,

    /// Upper bound on the number of blocks alive across all files.
    /// `None` means only real allocation failure limits growth.
    pub block_limit: Option<usize>,

    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Hard ceiling on the size of one file (in bytes)
    pub max_file_size: usize,

    // -------------------------------------------------------------------------
    // Descriptor Table Configuration
    // -------------------------------------------------------------------------
    /// Number of descriptor slots allocated up front; the table doubles when full
    pub initial_descriptor_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: 512,
            block_limit: None,
            max_file_size: 100 * 1024 * 1024, // 100 MB
            initial_descriptor_capacity: 10,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Maximum number of blocks one file may chain together
    pub fn max_blocks_per_file(&self) -> usize {
        self.max_file_size / self.block_size
    }

    /// Check that the tunables describe a usable engine
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(UfsError::InvalidConfig(
                "block_size must be greater than zero".to_string(),
            ));
        }
        if self.initial_descriptor_capacity == 0 {
            return Err(UfsError::InvalidConfig(
                "initial_descriptor_capacity must be greater than zero".to_string(),
            ));
        }
        if self.max_file_size < self.block_size {
            return Err(UfsError::InvalidConfig(format!(
                "max_file_size ({}) is smaller than block_size ({})",
                self.max_file_size, self.block_size
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the block capacity (in bytes)
    pub fn block_size(mut self, size: usize) -> Self {
        self.config.block_size = size;
        self
    }

    /// Cap the number of blocks alive across the engine
    pub fn block_limit(mut self, limit: usize) -> Self {
        self.config.block_limit = Some(limit);
        self
    }

    /// Set the maximum size of a single file (in bytes)
    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// Set the initial descriptor table capacity
    pub fn initial_descriptor_capacity(mut self, count: usize) -> Self {
        self.config.initial_descriptor_capacity = count;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
