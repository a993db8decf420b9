//! Configuration system for the cache model.
//!
//! This module defines the structures and enums used to parameterize a cache
//! instance. It provides:
//! 1. **Defaults:** Baseline geometry and shepherd-region constants.
//! 2. **Structures:** `CacheConfig` with per-field serde defaults.
//! 3. **Enums:** Replacement-policy selection for harness embedders.
//!
//! Configuration is supplied via JSON or built in code; `CacheConfig::default()`
//! gives a study-sized 8-way cache with a 4-way shepherd region.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default configuration constants for the cache model.
///
/// These values define the baseline geometry when not explicitly overridden
/// in a deserialized configuration.
mod defaults {
    /// Default cache size in bytes (32 KiB).
    pub const CACHE_SIZE: usize = 32 * 1024;

    /// Default cache line size in bytes (64 bytes).
    ///
    /// Matches typical modern processor cache line sizes.
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity (8 ways).
    pub const CACHE_WAYS: usize = 8;

    /// Default shepherd-region capacity (4 ways).
    ///
    /// The staging region must stay strictly smaller than the associativity
    /// so a main region remains for lines to graduate into.
    pub const SHEPHERD_WAYS: usize = 4;
}

/// Cache replacement policy algorithms.
///
/// Selects the algorithm used to pick which cache line to evict when a new
/// line must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyKind {
    /// Shepherd replacement policy.
    ///
    /// New lines stage through a small FIFO-ordered shepherd region; lines
    /// reused before being displaced graduate into an NRU-governed main
    /// region, so one-shot streaming fills are evicted cheaply.
    #[default]
    #[serde(alias = "Shepherd")]
    Shepherd,
    /// First In First Out replacement policy.
    ///
    /// Evicts the line with the oldest insertion tick.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the line with the oldest access tick.
    #[serde(alias = "Lru")]
    Lru,
    /// Random replacement policy.
    ///
    /// Evicts a pseudo-randomly selected line from the set.
    #[serde(alias = "Random")]
    Random,
}

/// Configuration for a single cache instance.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use shepcache_core::config::CacheConfig;
///
/// let config = CacheConfig::default();
/// assert_eq!(config.ways, 8);
/// assert_eq!(config.shepherd_ways, 4);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use shepcache_core::config::{CacheConfig, PolicyKind};
///
/// let json = r#"{
///     "size_bytes": 16384,
///     "line_bytes": 64,
///     "ways": 4,
///     "shepherd_ways": 2,
///     "policy": "SHEPHERD"
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.num_sets(), 64);
/// assert_eq!(config.policy, PolicyKind::Shepherd);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total capacity in bytes.
    #[serde(default = "CacheConfig::default_size_bytes")]
    pub size_bytes: usize,

    /// Line size in bytes.
    #[serde(default = "CacheConfig::default_line_bytes")]
    pub line_bytes: usize,

    /// Associativity (lines per set).
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Shepherd-region capacity per set; must satisfy `1 <= shepherd_ways < ways`.
    #[serde(default = "CacheConfig::default_shepherd_ways")]
    pub shepherd_ways: usize,

    /// Replacement policy selection for harness embedders.
    #[serde(default)]
    pub policy: PolicyKind,
}

impl CacheConfig {
    /// Returns the default total capacity.
    fn default_size_bytes() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default line size.
    fn default_line_bytes() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    /// Returns the default shepherd-region capacity.
    fn default_shepherd_ways() -> usize {
        defaults::SHEPHERD_WAYS
    }

    /// Total number of lines the configured geometry holds.
    pub const fn num_lines(&self) -> usize {
        if self.line_bytes == 0 {
            0
        } else {
            self.size_bytes / self.line_bytes
        }
    }

    /// Number of congruence classes (sets) the configured geometry holds.
    pub const fn num_sets(&self) -> usize {
        if self.ways == 0 {
            0
        } else {
            self.num_lines() / self.ways
        }
    }

    /// Checks the configuration before any cache or policy is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroGeometry`] if any geometry parameter is
    /// zero, [`ConfigError::MisalignedGeometry`] if the capacity does not
    /// split into whole sets, and — when the shepherd policy is selected —
    /// [`ConfigError::ShepherdRegion`] if the shepherd capacity is zero or
    /// not strictly smaller than the associativity. The shepherd bound is
    /// also enforced by the policy's own constructor, whatever the `policy`
    /// field says.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.size_bytes == 0 || self.line_bytes == 0 || self.ways == 0 {
            return Err(ConfigError::ZeroGeometry {
                size_bytes: self.size_bytes,
                line_bytes: self.line_bytes,
                ways: self.ways,
            });
        }
        let num_lines = self.size_bytes / self.line_bytes;
        if self.size_bytes % self.line_bytes != 0 || num_lines % self.ways != 0 || num_lines < self.ways
        {
            return Err(ConfigError::MisalignedGeometry {
                size_bytes: self.size_bytes,
                line_bytes: self.line_bytes,
                ways: self.ways,
            });
        }
        if matches!(self.policy, PolicyKind::Shepherd)
            && (self.shepherd_ways == 0 || self.shepherd_ways >= self.ways)
        {
            return Err(ConfigError::ShepherdRegion {
                shepherd_ways: self.shepherd_ways,
                ways: self.ways,
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            shepherd_ways: defaults::SHEPHERD_WAYS,
            policy: PolicyKind::default(),
        }
    }
}
