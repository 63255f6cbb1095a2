//! Records produced by a module scan

use super::Address;
use serde::{Deserialize, Serialize};

/// One scanned slot whose pointer-width contents passed pointer validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
    /// Hex form of `initial_address`
    pub key: String,
    /// First RTTI class name resolved for the slot's 8-byte value, if any
    pub name: Option<String>,
    pub initial_address: Address,
    pub address_value: Address,
    pub end_address: Address,
    /// Kept for export compatibility; nothing populates it.
    pub count_of_addresses: u32,
}

impl AddressEntry {
    /// Creates the entry for the slot at `initial_address`
    pub fn new(
        initial_address: Address,
        address_value: Address,
        end_address: Address,
        name: Option<String>,
    ) -> Self {
        AddressEntry {
            key: initial_address.to_key(),
            name,
            initial_address,
            address_value,
            end_address,
            count_of_addresses: 0,
        }
    }
}

/// One occurrence of a resolved class name at a raw pointer value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNameEntry {
    pub address: Address,
    /// 32-bit word read at `address`, a coarse fingerprint of the vtable
    pub pattern_value: u32,
}

impl ClassNameEntry {
    pub fn new(address: Address, pattern_value: u32) -> Self {
        ClassNameEntry {
            address,
            pattern_value,
        }
    }
}
