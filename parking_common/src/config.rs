//! Configuration loading traits and types.
//!
//! Every parking lot process reads one TOML file:
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "lot-north"
//!
//! [lot]
//! max_capacity = 150
//! authorized_drivers = ["Driver1", "Driver2"]
//!
//! [cycle]
//! cycle_time_us = 10000
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use parking_common::config::{ConfigError, ConfigLoader, LotConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = LotConfig::load(Path::new("lot.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::consts::{
    CYCLE_TIME_US, CYCLE_TIME_US_MAX, CYCLE_TIME_US_MIN, MAX_CAPACITY, MAX_CAPACITY_LIMIT,
};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields shared across all parking lot processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: "parking-lot".to_string(),
        }
    }
}

/// Occupancy and authorization settings for one lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LotSection {
    /// Maximum number of parked vehicles (default: 150).
    #[serde(default = "default_max_capacity")]
    pub max_capacity: usize,

    /// Drivers authorized at startup.
    #[serde(default)]
    pub authorized_drivers: Vec<String>,
}

fn default_max_capacity() -> usize {
    MAX_CAPACITY
}

impl Default for LotSection {
    fn default() -> Self {
        Self {
            max_capacity: MAX_CAPACITY,
            authorized_drivers: Vec::new(),
        }
    }
}

/// Scan-cycle timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleSection {
    /// Target cycle time in microseconds (default: 10000 = 10ms).
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u32,
}

fn default_cycle_time_us() -> u32 {
    CYCLE_TIME_US
}

impl Default for CycleSection {
    fn default() -> Self {
        Self {
            cycle_time_us: CYCLE_TIME_US,
        }
    }
}

/// Top-level lot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    #[serde(default)]
    pub lot: LotSection,
    #[serde(default)]
    pub cycle: CycleSection,
}

impl LotConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let capacity = self.lot.max_capacity;
        if !(1..=MAX_CAPACITY_LIMIT).contains(&capacity) {
            return Err(ConfigError::ValidationError(format!(
                "max_capacity {capacity} out of range [1, {MAX_CAPACITY_LIMIT}]"
            )));
        }
        if let Some(empty) = self.lot.authorized_drivers.iter().position(String::is_empty) {
            return Err(ConfigError::ValidationError(format!(
                "authorized_drivers[{empty}] is empty"
            )));
        }
        let cycle = self.cycle.cycle_time_us;
        if !(CYCLE_TIME_US_MIN..=CYCLE_TIME_US_MAX).contains(&cycle) {
            return Err(ConfigError::ValidationError(format!(
                "cycle_time_us {cycle} out of range [{CYCLE_TIME_US_MIN}, {CYCLE_TIME_US_MAX}]"
            )));
        }
        Ok(())
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation: any serde-deserializable struct can be loaded.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
