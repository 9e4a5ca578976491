//! Configuration file support
//!
//! Settings come from an optional TOML file; every key has a default so an
//! empty or missing file is valid. Command-line flags override file values.
//!
//! ```toml
//! [database]
//! path = "clients.db"
//!
//! [logging]
//! verbose = false
//!
//! [export]
//! default_format = "text"
//! ```

use crate::types::BankError;
use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_DATABASE_PATH: &str = "clients.db";

/// Export layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Labeled report with a summary header
    #[default]
    Text,
    /// Semicolon-separated rows
    Csv,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub default_format: ExportFormat,
}

impl BankConfig {
    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, `ConfigError` if it is not
    /// valid TOML or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let config: BankConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if one is given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, BankError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<(), BankError> {
        let path = self.database.path.to_string_lossy();
        if path.trim().is_empty() {
            return Err(BankError::config("database.path cannot be empty"));
        }
        if path.contains('\0') {
            return Err(BankError::config("database.path contains null bytes"));
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values
    pub fn with_overrides(mut self, database: Option<PathBuf>, verbose: bool) -> Self {
        if let Some(path) = database {
            self.database.path = path;
        }
        self.logging.verbose |= verbose;
        self
    }
}
