//! Target process description: architecture, module range and scan cursor

use super::{Address, MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target process architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TargetArch {
    X86,
    #[default]
    X64,
}

impl TargetArch {
    /// Returns the pointer size for this architecture
    pub const fn pointer_size(&self) -> u64 {
        match self {
            TargetArch::X86 => 4,
            TargetArch::X64 => 8,
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetArch::X86 => write!(f, "x86"),
            TargetArch::X64 => write!(f, "x64"),
        }
    }
}

/// Address span of one loaded module. Fixed for the duration of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRange {
    pub base: Address,
    pub end: Address,
    pub size: u32,
}

impl ModuleRange {
    /// Creates a range starting at `base` spanning `size` bytes
    pub fn new(base: Address, size: u32) -> MemoryResult<Self> {
        let end = base
            .checked_add(size as u64)
            .ok_or_else(|| MemoryError::InvalidAddress(format!("{} + 0x{:X}", base, size)))?;
        Ok(ModuleRange { base, end, size })
    }

    /// Creates a range from a byte length that may not fit the 32-bit size field
    pub fn from_len(base: Address, len: u64) -> MemoryResult<Self> {
        let size = u32::try_from(len).map_err(|_| MemoryError::ModuleTooLarge(len))?;
        Self::new(base, size)
    }

    /// Checks if an address is within this module
    pub fn contains(&self, address: Address) -> bool {
        address >= self.base && address < self.end
    }

    /// Number of whole `step`-sized slots in the module
    pub fn element_count(&self, step: u32) -> u64 {
        if step == 0 {
            return 0;
        }
        (self.size / step) as u64
    }
}

/// Position of the scan within a module.
///
/// `step` is the advance width. A trailing span shorter than `step` is never
/// visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    pub address: Address,
    pub step: u32,
}

impl ScanCursor {
    /// Creates a cursor at the start of `range`
    pub fn new(range: &ModuleRange, step: u32) -> Self {
        ScanCursor {
            address: range.base,
            step,
        }
    }

    /// Returns the current slot and advances, or `None` once the next whole
    /// step would cross `end`
    pub fn next_slot(&mut self, end: Address) -> Option<Address> {
        if self.step == 0 {
            return None;
        }
        let current = self.address;
        let slot_end = current.checked_add(self.step as u64)?;
        if slot_end > end {
            return None;
        }
        self.address = slot_end;
        Some(current)
    }
}
