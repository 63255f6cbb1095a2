//! Configuration validator for MemoryMosaic
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, LoggingConfig, OutputConfig, ScannerConfig, TargetConfig};

/// Largest supported address step, the widest read the scanner performs
const MAX_STEP: u32 = 8;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_target(&config.target)?;
        Self::validate_scanner(&config.scanner)?;
        Self::validate_output(&config.output)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates target configuration
    fn validate_target(target: &TargetConfig) -> Result<(), ConfigError> {
        if target.dump.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Module dump path cannot be empty".to_string(),
            ));
        }

        target.base_address()?;
        for region in &target.regions {
            if region.path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "Region path cannot be empty".to_string(),
                ));
            }
            region.base_address()?;
        }

        Ok(())
    }

    /// Validates scanner configuration
    fn validate_scanner(scanner: &ScannerConfig) -> Result<(), ConfigError> {
        match scanner.step {
            Some(0) => Err(ConfigError::Invalid(
                "Scan step must be at least 1".to_string(),
            )),
            Some(step) if step > MAX_STEP => Err(ConfigError::Invalid(format!(
                "Scan step cannot exceed {}",
                MAX_STEP
            ))),
            _ => Ok(()),
        }
    }

    /// Validates output configuration
    fn validate_output(output: &OutputConfig) -> Result<(), ConfigError> {
        if output.addresses_file.is_empty() || output.class_names_file.is_empty() {
            return Err(ConfigError::Invalid(
                "Output file names cannot be empty".to_string(),
            ));
        }

        if output.addresses_file == output.class_names_file {
            return Err(ConfigError::Invalid(
                "Output file names must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }

        if logging.file && logging.directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "Log directory cannot be empty when file logging is on".to_string(),
            ));
        }

        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
