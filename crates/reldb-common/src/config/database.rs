//! Database configuration structures.
//!
//! These structures define the configurable aspects of a reldb instance.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::constants::{DEFAULT_MAX_JOIN_TABLES, MAX_KEY_SIZE, MAX_VALUE_SIZE};

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main database configuration.
///
/// # Example
///
/// ```rust
/// use reldb_common::config::DatabaseConfig;
///
/// let config = DatabaseConfig::default();
/// assert_eq!(config.storage.max_key_size, 16 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Storage collaborator configuration.
    pub storage: StorageConfig,

    /// Query execution configuration.
    pub query: QueryConfig,
}

impl DatabaseConfig {
    /// Creates a small configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            storage: StorageConfig {
                max_key_size: 1024,
                max_value_size: 64 * 1024,
            },
            query: QueryConfig { max_join_tables: 4 },
        }
    }

    /// Parses a configuration from a TOML document.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.max_key_size == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_key_size must be positive".to_string(),
            ));
        }

        if self.storage.max_key_size > MAX_KEY_SIZE {
            return Err(ConfigError::Invalid(format!(
                "storage.max_key_size must not exceed {MAX_KEY_SIZE} bytes"
            )));
        }

        if self.storage.max_value_size < self.storage.max_key_size {
            return Err(ConfigError::Invalid(
                "storage.max_value_size must be at least storage.max_key_size".to_string(),
            ));
        }

        if self.storage.max_value_size > MAX_VALUE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "storage.max_value_size must not exceed {MAX_VALUE_SIZE} bytes"
            )));
        }

        if self.query.max_join_tables == 0 {
            return Err(ConfigError::Invalid(
                "query.max_join_tables must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Storage collaborator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum key size in bytes.
    /// Default: 16384 (16 KB)
    pub max_key_size: usize,

    /// Maximum value size in bytes.
    /// Default: 1048576 (1 MB)
    pub max_value_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_key_size: MAX_KEY_SIZE,
            max_value_size: MAX_VALUE_SIZE,
        }
    }
}

/// Query execution configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of tables in one FROM list.
    /// Default: 16
    pub max_join_tables: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_join_tables: DEFAULT_MAX_JOIN_TABLES,
        }
    }
}
