//! Fake collaborators shared by the integration tests

#![allow(dead_code)]

use memory_mosaic::{Address, MemoryAccess, MemoryError, MemoryResult, ModuleRange, RttiResolver, TargetArch};
use std::collections::HashMap;

/// Module image with slack after its end so wide reads at the last slot succeed
pub struct FakeMemory {
    pub arch: TargetArch,
    pub base: u64,
    pub module_size: u32,
    pub bytes: Vec<u8>,
    pub fail_at: Option<u64>,
    pub session: bool,
}

impl FakeMemory {
    pub fn new(arch: TargetArch, base: u64, module_size: u32) -> Self {
        FakeMemory {
            arch,
            base,
            module_size,
            bytes: vec![0; module_size as usize + 8],
            fail_at: None,
            session: true,
        }
    }

    pub fn failing_at(mut self, address: u64) -> Self {
        self.fail_at = Some(address);
        self
    }

    pub fn without_session(mut self) -> Self {
        self.session = false;
        self
    }

    pub fn put_u32(&mut self, address: u64, value: u32) {
        let offset = (address - self.base) as usize;
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, address: u64, value: u64) {
        let offset = (address - self.base) as usize;
        self.bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }
}

impl MemoryAccess for FakeMemory {
    fn has_session(&self) -> bool {
        self.session
    }

    fn arch(&self) -> TargetArch {
        self.arch
    }

    fn module_range(&self) -> MemoryResult<ModuleRange> {
        ModuleRange::new(Address::new(self.base), self.module_size)
    }

    fn read_bytes(&self, address: Address, len: usize) -> MemoryResult<Vec<u8>> {
        if self.fail_at == Some(address.as_u64()) {
            return Err(MemoryError::read_failed(address, "injected failure"));
        }
        address
            .as_u64()
            .checked_sub(self.base)
            .and_then(|offset| usize::try_from(offset).ok())
            .and_then(|offset| Some(offset..offset.checked_add(len)?))
            .and_then(|span| self.bytes.get(span))
            .map(<[u8]>::to_vec)
            .ok_or_else(|| MemoryError::read_failed(address, "outside fake image"))
    }
}

/// Resolver answering from a fixed table
#[derive(Default)]
pub struct FakeResolver {
    pub names: HashMap<u64, Vec<String>>,
    pub fail_at: Option<u64>,
}

impl FakeResolver {
    pub fn with(mut self, pointer: u64, names: &[&str]) -> Self {
        self.names
            .insert(pointer, names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn failing_at(mut self, pointer: u64) -> Self {
        self.fail_at = Some(pointer);
        self
    }
}

impl RttiResolver for FakeResolver {
    fn class_names_at(&self, pointer: Address) -> MemoryResult<Vec<String>> {
        if self.fail_at == Some(pointer.as_u64()) {
            return Err(MemoryError::Unknown("resolver failure".to_string()));
        }
        Ok(self.names.get(&pointer.as_u64()).cloned().unwrap_or_default())
    }
}
