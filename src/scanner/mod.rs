//! Module scanning for RTTI class names
//!
//! The scanner walks a module slot by slot, treats each slot's contents as a
//! candidate vtable pointer and records what it finds in two indices:
//! - `AddressIndex`: slots whose pointer-width value passed validation
//! - `ClassNameIndex`: resolved class names and the pointers they came from

pub mod address_space;
pub mod index;
pub mod progress;

pub use address_space::{AddressSpaceScanner, ScanOptions, ScanReport, ScanStatus};
pub use index::{AddressIndex, ClassNameIndex};
pub use progress::{
    ProgressSink, ProgressSnapshot, ProgressTracker, TracingProgressSink, PROGRESS_REPORT_PERCENT,
};
