//! Core module containing fundamental types for MemoryMosaic
//!
//! This module provides the foundational building blocks used throughout
//! the crate, including address handling, module ranges, scan records and
//! error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, AddressEntry, ClassNameEntry, MemoryError, MemoryResult, ModuleRange, TargetArch,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
