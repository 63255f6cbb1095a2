//! Collaborator interfaces the scanner reads the target through

use crate::core::types::{Address, MemoryError, MemoryResult, ModuleRange, TargetArch};

/// Read access to the target process.
///
/// Implementors only need `read_bytes`; the typed reads decode little-endian
/// values on top of it.
pub trait MemoryAccess {
    /// Whether a process/session is bound. Scanning without one is a
    /// precondition failure.
    fn has_session(&self) -> bool;

    /// Architecture of the target, which decides the pointer width
    fn arch(&self) -> TargetArch;

    /// Address span of the module to scan
    fn module_range(&self) -> MemoryResult<ModuleRange>;

    /// Read `len` raw bytes at `address`
    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>>;

    /// Read a 4-byte word
    fn read_u32(&self, address: Address) -> MemoryResult<u32> {
        let bytes = self.read_bytes(address, 4)?;
        Ok(u32::from_le_bytes(le_array(address, &bytes)?))
    }

    /// Read an 8-byte word
    fn read_u64(&self, address: Address) -> MemoryResult<u64> {
        let bytes = self.read_bytes(address, 8)?;
        Ok(u64::from_le_bytes(le_array(address, &bytes)?))
    }

    /// Read a value of the target's pointer width
    fn read_pointer(&self, address: Address) -> MemoryResult<Address> {
        match self.arch() {
            TargetArch::X86 => self.read_u32(address).map(Address::from),
            TargetArch::X64 => self.read_u64(address).map(Address::from),
        }
    }
}

/// Decides whether a raw value plausibly points into mapped memory
pub trait PointerValidator {
    /// Returns the end of the region containing `candidate`, or `None` when
    /// the value is not a plausible pointer
    fn validate(&self, candidate: Address) -> Option<Address>;

    fn is_valid_pointer(&self, candidate: Address) -> bool {
        self.validate(candidate).is_some()
    }
}

/// Resolves class names for a value interpreted as a vtable pointer
pub trait RttiResolver {
    /// Candidate class names, most-derived first. Empty when the value does
    /// not lead to RTTI.
    fn class_names_at(&self, pointer: Address) -> MemoryResult<Vec<String>>;

    /// The first candidate, unless there is none or it is empty
    fn first_class_name(&self, pointer: Address) -> MemoryResult<Option<String>> {
        Ok(self
            .class_names_at(pointer)?
            .into_iter()
            .next()
            .filter(|name| !name.is_empty()))
    }
}

fn le_array<const N: usize>(address: Address, bytes: &[u8]) -> MemoryResult<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| {
            MemoryError::read_failed(address, format!("short read: {} of {} bytes", bytes.len(), N))
        })
}
