//! Access to target memory
//!
//! This module defines the interfaces the scanner reads the target through
//! and ships offline implementations of them:
//! - `MemoryAccess`, `PointerValidator` and `RttiResolver` traits
//! - Snapshot-backed memory built from raw image dumps
//! - Region-based pointer validation
//! - MSVC RTTI class name resolution

pub mod access;
pub mod rtti;
pub mod snapshot;
pub mod validator;

pub use access::{MemoryAccess, PointerValidator, RttiResolver};
pub use rtti::{demangle_type_name, MsvcRttiResolver};
pub use snapshot::{SnapshotMemory, SnapshotRegion};
pub use validator::RegionPointerValidator;
