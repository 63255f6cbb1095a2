//! Configuration module for MemoryMosaic
//!
//! Provides configuration loading, validation, and default settings
//! for the scanner binary.

mod defaults;
mod loader;
mod validator;

pub use defaults::{
    DEFAULT_ADDRESSES_FILE, DEFAULT_BASE, DEFAULT_CLASS_NAMES_FILE, DEFAULT_DUMP,
    DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL, DEFAULT_OUTPUT_DIR,
};
pub use loader::{
    Config, ConfigError, ConfigLoader, LoggingConfig, OutputConfig, RegionConfig,
    ScannerConfig, TargetConfig,
};
pub use validator::{validate_config, ConfigValidator};

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;
