//! Access and eviction statistics collection and reporting.
//!
//! This module tracks behavioral counters for a cache instance. It provides:
//! 1. **Access counters:** Total accesses, hits, and misses.
//! 2. **Replacement counters:** Evictions of live lines, write-backs of dirty
//!    victims, and explicit invalidations.
//! 3. **Reporting:** Derived rates and a gem5-flavored text summary, plus
//!    serde serialization for machine consumption.

use serde::Serialize;

/// Behavioral counters for one cache instance.
///
/// Counters only — no timing. Write-backs are counted when a dirty line is
/// displaced or flushed, never modeled as latency.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Total accesses observed (hits + misses).
    pub accesses: u64,
    /// Accesses that found their line resident.
    pub hits: u64,
    /// Accesses that required a fill.
    pub misses: u64,
    /// Fills that displaced a live (valid) line.
    pub evictions: u64,
    /// Displaced or flushed lines that were dirty.
    pub writebacks: u64,
    /// Lines removed by explicit invalidation or flush.
    pub invalidations: u64,
}

impl CacheStats {
    /// Fraction of accesses that hit, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` before any access has been recorded.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Prints an aligned text summary to stdout.
    pub fn print(&self) {
        println!("cache_accesses           {}", self.accesses);
        println!("cache_hits               {}", self.hits);
        println!("cache_misses             {}", self.misses);
        println!("cache_hit_rate           {:.4}", self.hit_rate());
        println!("cache_evictions          {}", self.evictions);
        println!("cache_writebacks         {}", self.writebacks);
        println!("cache_invalidations      {}", self.invalidations);
    }
}
