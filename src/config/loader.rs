//! Configuration loader for MemoryMosaic
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::*;
use crate::core::types::{Address, TargetArch};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What to scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Raw image of the module to scan
    #[serde(default = "default_dump")]
    pub dump: PathBuf,
    /// Load address of the module, hex
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(default = "default_architecture")]
    pub architecture: TargetArch,
    /// Other mapped images that count as valid pointer targets
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

/// An additional memory image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub path: PathBuf,
    pub base: String,
}

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Address step in bytes. Defaults to the target pointer width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<u32>,
    #[serde(default = "default_deduplicate")]
    pub deduplicate: bool,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_addresses_file")]
    pub addresses_file: String,
    #[serde(default = "default_class_names_file")]
    pub class_names_file: String,
    /// Prefix file names with the scan start time so runs do not overwrite
    /// each other
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write log lines to a daily file
    #[serde(default = "default_log_to_file")]
    pub file: bool,
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
}

impl TargetConfig {
    /// Parsed module base
    pub fn base_address(&self) -> Result<Address, ConfigError> {
        parse_base(&self.base)
    }
}

impl RegionConfig {
    /// Parsed region base
    pub fn base_address(&self) -> Result<Address, ConfigError> {
        parse_base(&self.base)
    }
}

impl ScannerConfig {
    /// Step to use for a target of the given architecture
    pub fn effective_step(&self, arch: TargetArch) -> u32 {
        self.step.unwrap_or(arch.pointer_size() as u32)
    }
}

impl LoggingConfig {
    /// Log file for the given day, if file logging is enabled
    pub fn log_file_path(&self, day: NaiveDate) -> Option<PathBuf> {
        self.file.then(|| {
            self.directory
                .join(format!("memory-mosaic-{}.log", day.format("%Y%m%d")))
        })
    }
}

fn parse_base(value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value)
        .map_err(|_| ConfigError::Invalid(format!("Invalid base address: {}", value)))
}

impl Default for TargetConfig {
    fn default() -> Self {
        TargetConfig {
            dump: default_dump(),
            base: default_base(),
            module_name: None,
            architecture: default_architecture(),
            regions: Vec::new(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            step: None,
            deduplicate: default_deduplicate(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            directory: default_output_dir(),
            addresses_file: default_addresses_file(),
            class_names_file: default_class_names_file(),
            timestamp: default_timestamp(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: default_log_to_file(),
            directory: default_log_dir(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults only when the file is
    /// missing. A file that exists but does not parse is still an error.
    pub fn load_or_default(&self) -> Result<Config, ConfigError> {
        match self.load() {
            Err(ConfigError::FileNotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Saves configuration to file
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, contents)?;
        Ok(())
    }
}
