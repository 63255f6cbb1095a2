//! Default configuration values for MemoryMosaic

use crate::core::types::TargetArch;
use std::path::PathBuf;

pub const DEFAULT_DUMP: &str = "module.bin";
pub const DEFAULT_BASE: &str = "0x140000000";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_OUTPUT_DIR: &str = "scan-output";
pub const DEFAULT_ADDRESSES_FILE: &str = "key-value-pairs.json";
pub const DEFAULT_CLASS_NAMES_FILE: &str = "rtti-class-names.json";
pub const DEFAULT_LOG_DIR: &str = "logs";

pub(crate) fn default_dump() -> PathBuf {
    PathBuf::from(DEFAULT_DUMP)
}

pub(crate) fn default_base() -> String {
    DEFAULT_BASE.to_string()
}

pub(crate) fn default_architecture() -> TargetArch {
    TargetArch::X64
}

pub(crate) fn default_deduplicate() -> bool {
    true
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

pub(crate) fn default_addresses_file() -> String {
    DEFAULT_ADDRESSES_FILE.to_string()
}

pub(crate) fn default_class_names_file() -> String {
    DEFAULT_CLASS_NAMES_FILE.to_string()
}

pub(crate) fn default_timestamp() -> bool {
    true
}

pub(crate) fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub(crate) fn default_log_to_file() -> bool {
    true
}

pub(crate) fn default_log_dir() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(default_dump(), PathBuf::from("module.bin"));
        assert_eq!(default_base(), "0x140000000");
        assert_eq!(default_architecture(), TargetArch::X64);
        assert!(default_deduplicate());
        assert_eq!(default_log_level(), "info");
        assert!(default_log_to_file());
        assert_eq!(default_log_dir(), PathBuf::from("logs"));
        assert!(default_timestamp());
        assert!(default_addresses_file().ends_with(".json"));
        assert!(default_class_names_file().ends_with(".json"));
    }
}
