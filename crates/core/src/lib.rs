//! Set-associative cache model with a shepherd-region replacement policy.
//!
//! This crate implements cache-line replacement for set-associative caches with the following:
//! 1. **Shepherd policy:** FIFO staging region plus NRU-governed main region, with
//!    per-line insertion ticks and a bounded recency history (the featured policy).
//! 2. **Reference policies:** Timestamp FIFO, timestamp LRU, and LFSR Random, all
//!    implemented against the same per-line-record interface.
//! 3. **Harness:** A set-associative cache simulator that drives any policy through
//!    the touch/reset/invalidate/victim call contract.
//! 4. **Configuration:** Geometry and policy selection, deserializable from JSON.
//! 5. **Statistics:** Hit/miss/eviction counters with derived rates and reporting.

/// Set-associative cache harness and the replacement-policy family.
pub mod cache;
/// Cache configuration (defaults, policy selection, validation).
pub mod config;
/// Construction-time error types.
pub mod error;
/// Access and eviction statistics collection and reporting.
pub mod stats;

/// Cache configuration type; use `CacheConfig::default()` or deserialize from JSON.
pub use crate::config::CacheConfig;
/// Construction-time configuration error.
pub use crate::error::ConfigError;
/// The featured replacement policy; construct with `ShepherdPolicy::new`.
pub use crate::cache::policies::ShepherdPolicy;
/// Set-associative cache simulator; generic over the replacement policy.
pub use crate::cache::CacheSim;
