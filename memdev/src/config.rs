//! Unit table configuration.
//!
//! Every setting has a default. Override with `MEMDEV_*` environment
//! variables or a JSON document.

use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Number of units created when nothing is configured
pub const DEFAULT_UNIT_COUNT: i64 = 5;

/// Initial unit capacity: 16 pages of 4 KiB
pub const DEFAULT_CAPACITY: usize = 16 * 4096;

pub const DEFAULT_NAME_PREFIX: &str = "memdev";

pub const DEFAULT_LOCK_POLL_MS: u64 = 10;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid unit count {0}: must be a positive integer")]
    InvalidUnitCount(i64),

    #[error("invalid lock poll interval: must be greater than zero")]
    InvalidPollInterval,

    #[error("failed to parse {key}='{value}'")]
    Parse { key: String, value: String },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of units in the table. Signed so that a bad value can be
    /// reported rather than wrapped. Default: `5`.
    pub unit_count: i64,

    /// Initial buffer size of every unit in bytes; zero is allowed, a seek
    /// grows the unit. Default: `65536`.
    pub initial_capacity: usize,

    /// Unit names are `{name_prefix}{index}`. Default: `memdev`.
    pub name_prefix: String,

    /// Longest stretch a lock wait goes without checking for an interrupt.
    pub lock_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            unit_count: DEFAULT_UNIT_COUNT,
            initial_capacity: DEFAULT_CAPACITY,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            lock_poll_ms: DEFAULT_LOCK_POLL_MS,
        }
    }
}

impl Config {
    pub const ENV_NUM_DEVICES: &'static str = "MEMDEV_NUM_DEVICES";
    pub const ENV_CAPACITY: &'static str = "MEMDEV_CAPACITY";
    pub const ENV_NAME_PREFIX: &'static str = "MEMDEV_NAME_PREFIX";
    pub const ENV_LOCK_POLL_MS: &'static str = "MEMDEV_LOCK_POLL_MS";

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same keys as [`Config::from_env`], read from a map
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Parse a JSON document; missing fields keep their defaults
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(data)?)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            unit_count: parse_or(&lookup, Self::ENV_NUM_DEVICES, defaults.unit_count)?,
            initial_capacity: parse_or(&lookup, Self::ENV_CAPACITY, defaults.initial_capacity)?,
            name_prefix: lookup(Self::ENV_NAME_PREFIX).unwrap_or(defaults.name_prefix),
            lock_poll_ms: parse_or(&lookup, Self::ENV_LOCK_POLL_MS, defaults.lock_poll_ms)?,
        })
    }

    /// Check basic invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_count <= 0 {
            return Err(ConfigError::InvalidUnitCount(self.unit_count));
        }
        if self.lock_poll_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }

    #[must_use]
    pub fn lock_poll(&self) -> Duration {
        Duration::from_millis(self.lock_poll_ms)
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Parse {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
