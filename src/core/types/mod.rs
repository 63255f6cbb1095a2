//! Core type definitions for MemoryMosaic
//!
//! This module contains the fundamental types used throughout the crate:
//! target addresses, module ranges, scan records and error types.

mod address;
mod error;
mod scan_result;
mod target;

// Re-export all public types
pub use address::Address;
pub use error::{MemoryError, MemoryResult};
pub use scan_result::{AddressEntry, ClassNameEntry};
pub use target::{ModuleRange, ScanCursor, TargetArch};
