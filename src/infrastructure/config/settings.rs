//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; `DATABASE_URL` in the environment
//! (or a `.env` file) overrides the configured database.
//!
//! # Example
//!
//! ```no_run
//! use parimutuel::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::database::DatabaseConfig;
use super::ledger::LedgerConfig;
use super::logging::{LoggingConfig, FORMATS};
use crate::error::{ConfigError, Result};

/// Environment variable that overrides `[database] url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Main application configuration.
///
/// Every section falls back to its defaults when absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// SQLite location and pool settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Starting balances and lease timeout.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Does not consult the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden values fail validation.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            self.database.url = url;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.url",
            }
            .into());
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected one of {}", FORMATS.join(", ")),
            }
            .into());
        }
        if self.ledger.initial_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "ledger.initial_tokens",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
