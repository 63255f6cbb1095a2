//! MSVC run-time type information decoding
//!
//! An MSVC vtable is preceded by a pointer to its complete object locator.
//! The locator leads to the type descriptor of the most-derived class and to
//! the class hierarchy descriptor, whose base class array lists every class
//! in the hierarchy starting with the most-derived one.
//!
//! On x64 the locator stores image-relative offsets and its own offset, which
//! gives the image base. On x86 every reference is an absolute pointer.

use crate::core::types::{Address, MemoryResult, TargetArch};
use crate::memory::access::{MemoryAccess, RttiResolver};
use tracing::trace;

const COL_SIGNATURE_X86: u32 = 0;
const COL_SIGNATURE_X64: u32 = 1;

const COL_TYPE_DESCRIPTOR: u64 = 0x0C;
const COL_CLASS_DESCRIPTOR: u64 = 0x10;
const COL_SELF: u64 = 0x14;

const CHD_NUM_BASE_CLASSES: u64 = 0x08;
const CHD_BASE_CLASS_ARRAY: u64 = 0x0C;

const MAX_NAME_LEN: usize = 512;
const MAX_BASE_CLASSES: u32 = 64;

/// Resolves class names from MSVC RTTI structures in target memory
pub struct MsvcRttiResolver<'a> {
    memory: &'a dyn MemoryAccess,
}

impl<'a> MsvcRttiResolver<'a> {
    pub fn new(memory: &'a dyn MemoryAccess) -> Self {
        MsvcRttiResolver { memory }
    }

    fn arch(&self) -> TargetArch {
        self.memory.arch()
    }

    /// Turns a stored reference into an address: image-relative on x64,
    /// absolute on x86
    fn reference(&self, image_base: Address, at: Address) -> Option<Address> {
        let raw = self.memory.read_u32(at).ok()?;
        if raw == 0 {
            return None;
        }
        match self.arch() {
            TargetArch::X64 => image_base.checked_add(raw as u64),
            TargetArch::X86 => Some(Address::from(raw)),
        }
    }

    /// Locates the complete object locator for a vtable and the image base
    /// its references are relative to
    fn locate(&self, vtable: Address) -> Option<(Address, Address)> {
        let slot = vtable.checked_sub(self.arch().pointer_size())?;
        let locator = self.memory.read_pointer(slot).ok()?;
        if locator.is_null() {
            return None;
        }

        let signature = self.memory.read_u32(locator).ok()?;
        match (self.arch(), signature) {
            (TargetArch::X64, COL_SIGNATURE_X64) => {
                let self_rva = self.memory.read_u32(locator.checked_add(COL_SELF)?).ok()?;
                let image_base = locator.checked_sub(self_rva as u64)?;
                Some((locator, image_base))
            }
            (TargetArch::X86, COL_SIGNATURE_X86) => Some((locator, Address::null())),
            _ => None,
        }
    }

    /// Reads and demangles the name stored in a type descriptor
    fn type_name(&self, descriptor: Address) -> Option<String> {
        let name_at = descriptor.checked_add(2 * self.arch().pointer_size())?;
        let raw = self.read_c_string(name_at)?;
        demangle_type_name(&raw)
    }

    fn read_c_string(&self, address: Address) -> Option<String> {
        let mut bytes = Vec::new();
        let mut cursor = address;
        while bytes.len() < MAX_NAME_LEN {
            let byte = *self.memory.read_bytes(cursor, 1).ok()?.first()?;
            if byte == 0 {
                return String::from_utf8(bytes).ok();
            }
            bytes.push(byte);
            cursor = cursor.checked_add(1)?;
        }
        None
    }

    /// Names from the class hierarchy descriptor, most-derived first
    fn hierarchy_names(&self, image_base: Address, hierarchy: Address) -> Vec<String> {
        let count = match hierarchy
            .checked_add(CHD_NUM_BASE_CLASSES)
            .and_then(|at| self.memory.read_u32(at).ok())
        {
            Some(count) => count.min(MAX_BASE_CLASSES),
            None => return Vec::new(),
        };
        let array = match hierarchy
            .checked_add(CHD_BASE_CLASS_ARRAY)
            .and_then(|at| self.reference(image_base, at))
        {
            Some(array) => array,
            None => return Vec::new(),
        };

        let mut names: Vec<String> = Vec::new();
        for index in 0..count as u64 {
            let name = array
                .checked_add(index * 4)
                .and_then(|entry| self.reference(image_base, entry))
                .and_then(|descriptor| self.reference(image_base, descriptor))
                .and_then(|type_descriptor| self.type_name(type_descriptor));
            match name {
                Some(name) if !names.contains(&name) => names.push(name),
                Some(_) => {}
                None => break,
            }
        }
        names
    }
}

impl RttiResolver for MsvcRttiResolver<'_> {
    fn class_names_at(&self, pointer: Address) -> MemoryResult<Vec<String>> {
        let Some((locator, image_base)) = self.locate(pointer) else {
            return Ok(Vec::new());
        };

        let Some(most_derived) = locator
            .checked_add(COL_TYPE_DESCRIPTOR)
            .and_then(|at| self.reference(image_base, at))
            .and_then(|descriptor| self.type_name(descriptor))
        else {
            return Ok(Vec::new());
        };

        let mut names = locator
            .checked_add(COL_CLASS_DESCRIPTOR)
            .and_then(|at| self.reference(image_base, at))
            .map(|hierarchy| self.hierarchy_names(image_base, hierarchy))
            .unwrap_or_default();

        if names.first() != Some(&most_derived) {
            names.retain(|name| name != &most_derived);
            names.insert(0, most_derived);
        }

        trace!(vtable = %pointer, classes = ?names, "Resolved RTTI");
        Ok(names)
    }
}

/// Converts a decorated type descriptor name such as `.?AVWidget@ui@@` into
/// `ui::Widget`. Templated and other special names are returned with only the
/// prefix and terminator removed. Returns `None` for non-class names.
pub fn demangle_type_name(decorated: &str) -> Option<String> {
    let body = decorated
        .strip_prefix(".?AV")
        .or_else(|| decorated.strip_prefix(".?AU"))?;
    let body = body.strip_suffix("@@").unwrap_or(body);
    if body.is_empty() {
        return None;
    }
    if body.starts_with('?') {
        return Some(body.to_string());
    }

    let scopes: Vec<&str> = body.split('@').filter(|s| !s.is_empty()).rev().collect();
    Some(scopes.join("::"))
}
