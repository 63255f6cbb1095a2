//! Word-by-word walk over a module's address range

use crate::core::types::{
    Address, AddressEntry, ClassNameEntry, MemoryError, MemoryResult, ModuleRange, ScanCursor,
    TargetArch,
};
use crate::memory::{MemoryAccess, PointerValidator, RttiResolver};
use crate::scanner::index::{AddressIndex, ClassNameIndex};
use crate::scanner::progress::{ProgressSink, ProgressTracker};
use std::time::Duration;
use tracing::{error, info, trace, warn};

/// Options for a module scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Bytes to advance between slots
    pub step: u32,
    /// Run the duplicate address value removal once a scan completes
    pub deduplicate: bool,
    /// Name used in log lines
    pub module_name: Option<String>,
}

impl ScanOptions {
    /// Options stepping by the target's pointer width
    pub fn for_arch(arch: TargetArch) -> Self {
        ScanOptions {
            step: arch.pointer_size() as u32,
            ..ScanOptions::default()
        }
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = Some(name.into());
        self
    }

    fn module_label(&self) -> &str {
        self.module_name.as_deref().unwrap_or("<unknown>")
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            step: 8,
            deduplicate: true,
            module_name: None,
        }
    }
}

/// How a scan ended
#[derive(Debug)]
pub enum ScanStatus {
    /// Every slot in the range was visited
    Completed,
    /// A read or resolve failed at `address`; the indices are partial
    Aborted { address: Address, error: MemoryError },
}

/// Everything a scan produced
#[derive(Debug)]
pub struct ScanReport {
    pub range: ModuleRange,
    pub step: u32,
    pub addresses: AddressIndex,
    pub class_names: ClassNameIndex,
    pub status: ScanStatus,
    /// Slots fully processed
    pub visited: u64,
    /// Slots in the range
    pub total: u64,
    pub removed_duplicates: usize,
    pub elapsed: Duration,
}

impl ScanReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, ScanStatus::Completed)
    }

    /// The error that ended the scan early, if any
    pub fn abort_error(&self) -> Option<(Address, &MemoryError)> {
        match &self.status {
            ScanStatus::Completed => None,
            ScanStatus::Aborted { address, error } => Some((*address, error)),
        }
    }
}

/// What one slot contributes to the indices
struct SlotFindings {
    address_entry: Option<AddressEntry>,
    class_name: Option<(String, ClassNameEntry)>,
}

/// Scans a module for vtable pointers and the class names behind them
pub struct AddressSpaceScanner<'a> {
    memory: &'a dyn MemoryAccess,
    validator: &'a dyn PointerValidator,
    resolver: &'a dyn RttiResolver,
    options: ScanOptions,
}

impl<'a> AddressSpaceScanner<'a> {
    pub fn new(
        memory: &'a dyn MemoryAccess,
        validator: &'a dyn PointerValidator,
        resolver: &'a dyn RttiResolver,
    ) -> Self {
        AddressSpaceScanner {
            memory,
            validator,
            resolver,
            options: ScanOptions::for_arch(memory.arch()),
        }
    }

    pub fn with_options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Scan the module reported by the memory access.
    ///
    /// Returns `Err` only when the scan cannot start. Failures while walking
    /// end the scan early and are reported through `ScanReport::status`.
    pub fn scan(&self, sink: &mut dyn ProgressSink) -> MemoryResult<ScanReport> {
        if !self.memory.has_session() {
            return Err(MemoryError::invalid_handle("Invalid Process Handle"));
        }
        let range = self.memory.module_range()?;
        self.scan_range(range, sink)
    }

    /// Scan an explicit range
    pub fn scan_range(
        &self,
        range: ModuleRange,
        sink: &mut dyn ProgressSink,
    ) -> MemoryResult<ScanReport> {
        if !self.memory.has_session() {
            return Err(MemoryError::invalid_handle("Invalid Process Handle"));
        }
        let step = self.options.step;
        if step == 0 {
            return Err(MemoryError::InvalidStep(step));
        }

        let total = range.element_count(step);
        info!("Module Size: {} bytes", range.size);
        info!("Number of elements: {}", total);

        let mut addresses = AddressIndex::new();
        let mut class_names = ClassNameIndex::new();
        let mut tracker = ProgressTracker::new(total);
        let mut cursor = ScanCursor::new(&range, step);

        let status = loop {
            let Some(address) = cursor.next_slot(range.end) else {
                break ScanStatus::Completed;
            };

            match self.scan_slot(address) {
                Ok(findings) => {
                    if let Some(entry) = findings.address_entry {
                        addresses.insert(entry);
                    }
                    if let Some((name, entry)) = findings.class_name {
                        class_names.record(&name, entry);
                    }
                    tracker.advance(&class_names, sink);
                }
                Err(err) => {
                    error!(
                        module = self.options.module_label(),
                        address = %address,
                        error = %err,
                        "Exception occurred while scanning module"
                    );
                    break ScanStatus::Aborted {
                        address,
                        error: err,
                    };
                }
            }
        };
        tracker.finish(&class_names, sink);

        // Partial indices are reported as collected
        let removed_duplicates = if self.options.deduplicate
            && matches!(status, ScanStatus::Completed)
        {
            addresses.remove_duplicate_address_values()
        } else {
            0
        };

        let elapsed = tracker.elapsed();
        match &status {
            ScanStatus::Completed => info!(
                addresses = addresses.len(),
                classes = class_names.bucket_count(),
                "Completed scanning {}. Time taken: {:?}",
                self.options.module_label(),
                elapsed
            ),
            ScanStatus::Aborted { address, .. } => warn!(
                visited = tracker.iteration(),
                total,
                "Scan of {} terminated early at {}; results are partial",
                self.options.module_label(),
                address
            ),
        }

        Ok(ScanReport {
            range,
            step,
            addresses,
            class_names,
            status,
            visited: tracker.iteration(),
            total,
            removed_duplicates,
            elapsed,
        })
    }

    /// Performs every fallible read for one slot before anything is recorded,
    /// so a failing slot leaves no trace in the indices
    fn scan_slot(&self, address: Address) -> MemoryResult<SlotFindings> {
        let pointer = Address::new(self.memory.read_u64(address)?);

        // The target of an arbitrary value is often unmapped
        let pattern_value = self.memory.read_u32(pointer).unwrap_or_else(|err| {
            trace!(pointer = %pointer, error = %err, "Pattern word unreadable");
            0
        });

        let value = self.memory.read_pointer(address)?;
        let class_name = self.resolver.first_class_name(pointer)?;

        let address_entry = self
            .validator
            .validate(value)
            .map(|end| AddressEntry::new(address, value, end, class_name.clone()));

        Ok(SlotFindings {
            address_entry,
            class_name: class_name.map(|name| (name, ClassNameEntry::new(pointer, pattern_value))),
        })
    }
}
