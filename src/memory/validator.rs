//! Pointer plausibility checks against known mapped regions

use crate::core::types::Address;
use crate::memory::access::PointerValidator;
use crate::memory::snapshot::SnapshotMemory;

/// A value is a valid pointer when it is non-null and falls inside one of
/// the known regions. The reported end is that region's end.
#[derive(Debug, Clone, Default)]
pub struct RegionPointerValidator {
    regions: Vec<(Address, Address)>,
}

impl RegionPointerValidator {
    pub fn new() -> Self {
        RegionPointerValidator::default()
    }

    /// Build from every image in a snapshot
    pub fn from_snapshot(memory: &SnapshotMemory) -> Self {
        let regions = memory
            .regions()
            .iter()
            .map(|region| (region.base, region.end()))
            .collect();
        RegionPointerValidator { regions }
    }

    /// Add a `[start, end)` region
    pub fn with_region(mut self, start: Address, end: Address) -> Self {
        self.regions.push((start, end));
        self
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl PointerValidator for RegionPointerValidator {
    fn validate(&self, candidate: Address) -> Option<Address> {
        if candidate.is_null() {
            return None;
        }
        self.regions
            .iter()
            .find(|(start, end)| candidate >= *start && candidate < *end)
            .map(|(_, end)| *end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TargetArch;
    use crate::memory::snapshot::SnapshotRegion;

    #[test]
    fn test_validate_reports_region_end() {
        let validator = RegionPointerValidator::new()
            .with_region(Address::new(0x1000), Address::new(0x2000))
            .with_region(Address::new(0x8000), Address::new(0x8100));

        assert_eq!(validator.validate(Address::new(0x1000)), Some(Address::new(0x2000)));
        assert_eq!(validator.validate(Address::new(0x80FF)), Some(Address::new(0x8100)));
        assert_eq!(validator.validate(Address::new(0x2000)), None);
        assert!(!validator.is_valid_pointer(Address::new(0x0FFF)));
    }

    #[test]
    fn test_null_is_never_valid() {
        let validator =
            RegionPointerValidator::new().with_region(Address::null(), Address::new(0x100));
        assert_eq!(validator.validate(Address::null()), None);
        assert!(validator.is_valid_pointer(Address::new(0x10)));
    }

    #[test]
    fn test_from_snapshot() {
        let mut memory = SnapshotMemory::with_module(
            TargetArch::X64,
            SnapshotRegion::new("mod", Address::new(0x1000), vec![0; 0x100]),
        );
        memory.add_region(SnapshotRegion::new("data", Address::new(0x5000), vec![0; 0x10]));

        let validator = RegionPointerValidator::from_snapshot(&memory);
        assert_eq!(validator.region_count(), 2);
        assert_eq!(validator.validate(Address::new(0x1080)), Some(Address::new(0x1100)));
        assert_eq!(validator.validate(Address::new(0x500F)), Some(Address::new(0x5010)));
        assert_eq!(validator.validate(Address::new(0x5010)), None);
    }
}
