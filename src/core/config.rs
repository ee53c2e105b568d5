/*!
 * Simulation Configuration
 *
 * Runtime configuration for the engine, overlaid from environment variables:
 * - SIMUVOS_INTERVAL_MS: initial tick period (default: 1000, floor 100)
 * - SIMUVOS_MEMORY_MIN / SIMUVOS_MEMORY_MAX: bounds of the memory draw in bytes
 * - SIMUVOS_SEED: fixed seed for reproducible allocation
 * - SIMUVOS_EVENT_CAPACITY: engine event channel buffer
 */

use super::errors::{AllocatorError, ConfigError};
use super::limits::{
    DEFAULT_EVENT_CAPACITY, DEFAULT_INTERVAL_MS, DEFAULT_MEMORY_MAX, DEFAULT_MEMORY_MIN,
    MIN_INTERVAL_MS,
};
use super::types::{Bytes, IntervalMs};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_INTERVAL_MS: &str = "SIMUVOS_INTERVAL_MS";
pub const ENV_MEMORY_MIN: &str = "SIMUVOS_MEMORY_MIN";
pub const ENV_MEMORY_MAX: &str = "SIMUVOS_MEMORY_MAX";
pub const ENV_SEED: &str = "SIMUVOS_SEED";
pub const ENV_EVENT_CAPACITY: &str = "SIMUVOS_EVENT_CAPACITY";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SimulationConfig {
    /// Tick period the clock starts with (clamped to the 100ms floor on use)
    pub initial_interval_ms: IntervalMs,
    /// Smallest memory quantity handed to a process
    pub memory_min_bytes: Bytes,
    /// Largest memory quantity handed to a process
    pub memory_max_bytes: Bytes,
    /// Seed for the random allocator; `None` draws from OS entropy
    pub seed: Option<u64>,
    /// Buffer size of the broadcast event channel
    pub event_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: DEFAULT_INTERVAL_MS,
            memory_min_bytes: DEFAULT_MEMORY_MIN,
            memory_max_bytes: DEFAULT_MEMORY_MAX,
            seed: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SimulationConfig {
    /// Load defaults overlaid with `SIMUVOS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(interval) = parse_var::<IntervalMs, _>(&lookup, ENV_INTERVAL_MS)? {
            config.initial_interval_ms = interval;
        }
        if let Some(min) = parse_var::<Bytes, _>(&lookup, ENV_MEMORY_MIN)? {
            config.memory_min_bytes = min;
        }
        if let Some(max) = parse_var::<Bytes, _>(&lookup, ENV_MEMORY_MAX)? {
            config.memory_max_bytes = max;
        }
        if let Some(seed) = parse_var::<u64, _>(&lookup, ENV_SEED)? {
            config.seed = Some(seed);
        }
        if let Some(capacity) = parse_var::<usize, _>(&lookup, ENV_EVENT_CAPACITY)? {
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    var: ENV_EVENT_CAPACITY.to_string(),
                    value: capacity.to_string(),
                    reason: "capacity must be positive".to_string(),
                });
            }
            config.event_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the memory range the allocator will be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.memory_min_bytes == 0 {
            return Err(AllocatorError::ZeroMemory.into());
        }
        if self.memory_min_bytes > self.memory_max_bytes {
            return Err(AllocatorError::InvalidRange {
                min: self.memory_min_bytes,
                max: self.memory_max_bytes,
            }
            .into());
        }
        Ok(())
    }

    /// Initial interval after applying the floor
    #[inline]
    #[must_use]
    pub fn effective_interval_ms(&self) -> IntervalMs {
        self.initial_interval_ms.max(MIN_INTERVAL_MS)
    }

    #[inline]
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: IntervalMs) -> Self {
        self.initial_interval_ms = interval_ms;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_memory_range(mut self, min: Bytes, max: Bytes) -> Self {
        self.memory_min_bytes = min;
        self.memory_max_bytes = max;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        })
}
