//! MemoryMosaic: recovers RTTI class names by scanning a module's address
//! space for vtable pointers

pub mod config;
pub mod core;
pub mod export;
pub mod memory;
pub mod scanner;

// Re-export main types from core module
pub use core::types::{
    Address, AddressEntry, ClassNameEntry, MemoryError, MemoryResult, ModuleRange, ScanCursor,
    TargetArch,
};

pub use memory::{MemoryAccess, PointerValidator, RttiResolver};
pub use scanner::{
    AddressIndex, AddressSpaceScanner, ClassNameIndex, ProgressSink, ProgressSnapshot,
    ScanOptions, ScanReport, ScanStatus,
};
