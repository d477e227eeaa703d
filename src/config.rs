//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default interval between background sweeps, in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

const ENV_SWEEP_INTERVAL: &str = "TTL_CACHE_SWEEP_INTERVAL_SECS";
const ENV_ACTIVE_SWEEP: &str = "TTL_CACHE_ACTIVE_SWEEP";
const ENV_MAX_ENTRIES: &str = "TTL_CACHE_MAX_ENTRIES";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Interval between background sweeps
    pub sweep_interval: Duration,
    /// Whether to run the background sweeper at all
    pub active_sweep: bool,
    /// Maximum number of entries, None = unbounded
    pub max_entries: Option<usize>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TTL_CACHE_SWEEP_INTERVAL_SECS` - Sweep interval in seconds (default: 60)
    /// - `TTL_CACHE_ACTIVE_SWEEP` - `true`/`false`/`1`/`0` (default: true)
    /// - `TTL_CACHE_MAX_ENTRIES` - Capacity limit (default: unbounded)
    ///
    /// Unset variables fall back to defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let sweep_interval = match lookup(ENV_SWEEP_INTERVAL) {
            Some(raw) => Duration::from_secs(parse_var(ENV_SWEEP_INTERVAL, &raw)?),
            None => defaults.sweep_interval,
        };

        let active_sweep = match lookup(ENV_ACTIVE_SWEEP) {
            Some(raw) => parse_bool(ENV_ACTIVE_SWEEP, &raw)?,
            None => defaults.active_sweep,
        };

        let max_entries = match lookup(ENV_MAX_ENTRIES) {
            Some(raw) => Some(parse_var(ENV_MAX_ENTRIES, &raw)?),
            None => defaults.max_entries,
        };

        let config = Self {
            sweep_interval,
            active_sweep,
            max_entries,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.active_sweep && self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero".to_string(),
            ));
        }
        if self.max_entries == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
            active_sweep: true,
            max_entries: None,
        }
    }
}

fn parse_var<V: std::str::FromStr>(name: &str, raw: &str) -> Result<V> {
    raw.trim()
        .parse()
        .map_err(|_| CacheError::InvalidConfig(format!("{name}: cannot parse '{raw}'")))
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CacheError::InvalidConfig(format!(
            "{name}: expected a boolean, got '{raw}'"
        ))),
    }
}
