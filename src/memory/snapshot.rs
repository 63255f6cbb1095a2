//! In-memory images of a target's address space
//!
//! A snapshot is a set of byte images, each placed at the address it was
//! loaded at in the target. The first image is the module being scanned;
//! further images describe other mapped memory that vtables and RTTI data
//! may live in.
//!
//! A dump only covers the image itself, while the live mapping extends to the
//! next page boundary. Reads that start inside an image and run past its end
//! see zeroes up to that boundary.

use crate::core::types::{Address, MemoryError, MemoryResult, ModuleRange, TargetArch};
use crate::memory::access::MemoryAccess;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Granularity the tail of an image is mapped with
const PAGE_SIZE: u64 = 0x1000;

/// One contiguous image of target memory
#[derive(Debug, Clone)]
pub struct SnapshotRegion {
    pub name: String,
    pub base: Address,
    pub bytes: Vec<u8>,
}

impl SnapshotRegion {
    pub fn new(name: impl Into<String>, base: Address, bytes: Vec<u8>) -> Self {
        SnapshotRegion {
            name: name.into(),
            base,
            bytes,
        }
    }

    /// Load an image from a raw dump file
    pub fn from_file<P: AsRef<Path>>(path: P, base: Address) -> MemoryResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(region = %name, base = %base, size = bytes.len(), "Loaded memory image");
        Ok(SnapshotRegion::new(name, base, bytes))
    }

    /// One past the last byte of the image
    pub fn end(&self) -> Address {
        Address::new(self.base.as_u64().saturating_add(self.bytes.len() as u64))
    }

    pub fn contains(&self, address: Address) -> bool {
        address >= self.base && address < self.end()
    }

    /// End of the last page the image occupies
    fn mapped_end(&self) -> u64 {
        let len = self.bytes.len() as u64;
        let pages = len.div_ceil(PAGE_SIZE).max(1);
        self.base.as_u64().saturating_add(pages * PAGE_SIZE)
    }

    /// `len` bytes at `address`, zero-filled past the image up to the page
    /// boundary. `None` unless `address` lies inside the image.
    fn read(&self, address: Address, len: usize) -> Option<Vec<u8>> {
        if !self.contains(address) {
            return None;
        }
        let read_end = address.as_u64().checked_add(len as u64)?;
        if read_end > self.mapped_end() {
            return None;
        }

        let start = usize::try_from(address.as_u64() - self.base.as_u64()).ok()?;
        let end = start.saturating_add(len).min(self.bytes.len());
        let mut bytes = self.bytes[start..end].to_vec();
        bytes.resize(len, 0);
        Some(bytes)
    }
}

/// `MemoryAccess` over a set of loaded images
#[derive(Debug, Clone)]
pub struct SnapshotMemory {
    arch: TargetArch,
    regions: Vec<SnapshotRegion>,
}

impl SnapshotMemory {
    /// Create an empty snapshot. It has no session until a module is added.
    pub fn new(arch: TargetArch) -> Self {
        SnapshotMemory {
            arch,
            regions: Vec::new(),
        }
    }

    /// Create a snapshot whose module image is `module`
    pub fn with_module(arch: TargetArch, module: SnapshotRegion) -> Self {
        SnapshotMemory {
            arch,
            regions: vec![module],
        }
    }

    /// Add another mapped image
    pub fn add_region(&mut self, region: SnapshotRegion) {
        self.regions.push(region);
    }

    pub fn regions(&self) -> &[SnapshotRegion] {
        &self.regions
    }

    /// The scanned module, which is the first image
    pub fn module(&self) -> Option<&SnapshotRegion> {
        self.regions.first()
    }
}

impl MemoryAccess for SnapshotMemory {
    fn has_session(&self) -> bool {
        !self.regions.is_empty()
    }

    fn arch(&self) -> TargetArch {
        self.arch
    }

    fn module_range(&self) -> MemoryResult<ModuleRange> {
        let module = self
            .module()
            .ok_or_else(|| MemoryError::ModuleNotFound("no module image loaded".to_string()))?;
        ModuleRange::from_len(module.base, module.bytes.len() as u64)
    }

    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        self.regions
            .iter()
            .find_map(|region| region.read(address, len))
            .ok_or_else(|| {
                MemoryError::read_failed(address, format!("{} bytes not mapped in snapshot", len))
            })
    }
}
