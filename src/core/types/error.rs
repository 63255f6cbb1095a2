//! Custom error types for MemoryMosaic

use std::fmt;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Invalid scan step: {0}")]
    InvalidStep(u32),

    #[error("Module too large: {0} bytes")]
    ModuleTooLarge(u64),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates the error reported when no process session is bound
    pub fn invalid_handle(reason: impl Into<String>) -> Self {
        MemoryError::InvalidHandle(reason.into())
    }
}
