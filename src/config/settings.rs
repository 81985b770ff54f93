//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::library::DEFAULT_LIBRARY_NAME;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Name shown in reports and the menu banner.
    #[serde(default = "default_library_name")]
    pub library_name: String,

    /// Directory holding the JSON data files.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Lending rules.
    #[serde(default)]
    pub lending: LendingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            _schema: None,
            _comment: None,
            library_name: default_library_name(),
            data_dir: None,
            lending: LendingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.library_name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "library_name must not be empty".to_string(),
            });
        }

        if self.lending.max_books_per_member == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "lending.max_books_per_member must be at least 1 (omit it for no limit)"
                    .to_string(),
            });
        }
        Ok(())
    }
}

fn default_library_name() -> String {
    DEFAULT_LIBRARY_NAME.to_string()
}

/// Lending configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LendingConfig {
    /// Maximum books a member may hold at once. Absent means unlimited.
    #[serde(default)]
    pub max_books_per_member: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
