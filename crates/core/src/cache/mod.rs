//! Set-Associative Cache Simulator.
//!
//! This module implements a configurable set-associative cache harness. It
//! owns the tag/valid/dirty storage and one replacement record per way, and
//! drives the attached policy through the replacement call contract: touch on
//! a hit; victim selection, invalidate, then reset on a miss; invalidate on a
//! flush or an explicit invalidation. It models residency only — no access
//! latency and no data movement.

/// Cache replacement policy implementations (Shepherd, FIFO, LRU, Random).
pub mod policies;

use core::fmt;

use self::policies::ReplacementPolicy;
use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::stats::CacheStats;

/// Cache line entry containing tag, validity, and dirty bits.
#[derive(Clone, Default)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
}

/// Cache simulator implementing a set-associative cache over a replacement
/// policy.
///
/// The policy is a type parameter, so each instance carries the concrete
/// per-line records its policy defines — no downcasting anywhere. Construct
/// with a validated [`CacheConfig`] and a policy instance:
///
/// ```
/// use shepcache_core::cache::CacheSim;
/// use shepcache_core::cache::policies::ShepherdPolicy;
/// use shepcache_core::config::CacheConfig;
///
/// let config = CacheConfig::default();
/// let policy = ShepherdPolicy::from_config(&config).unwrap();
/// let mut cache = CacheSim::new(&config, policy).unwrap();
/// assert!(!cache.access(0x1000, false));
/// assert!(cache.access(0x1000, false));
/// ```
pub struct CacheSim<P: ReplacementPolicy> {
    lines: Vec<CacheLine>,
    repl: Vec<P::Line>,
    policy: P,
    num_sets: usize,
    ways: usize,
    line_bytes: usize,
    /// Behavioral counters for this instance.
    pub stats: CacheStats,
}

impl<P: ReplacementPolicy> CacheSim<P> {
    /// Creates a new cache simulator with the specified configuration and
    /// replacement policy.
    ///
    /// # Arguments
    ///
    /// * `config` - Cache geometry (size, associativity, line size).
    /// * `policy` - The replacement policy instance to drive.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`CacheConfig::validate`] for
    /// degenerate geometry; nothing is clamped silently.
    pub fn new(config: &CacheConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;

        let num_lines = config.num_lines();
        let num_sets = config.num_sets();
        let repl = (0..num_lines).map(|_| policy.instantiate()).collect();

        tracing::debug!(
            num_sets,
            ways = config.ways,
            line_bytes = config.line_bytes,
            "cache constructed"
        );

        Ok(Self {
            lines: vec![CacheLine::default(); num_lines],
            repl,
            policy,
            num_sets,
            ways: config.ways,
            line_bytes: config.line_bytes,
            stats: CacheStats::default(),
        })
    }

    /// Number of congruence classes (sets).
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity (lines per set).
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The attached replacement policy.
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Set index and tag for an address.
    fn locate(&self, addr: u64) -> (usize, u64) {
        let set_index = ((addr as usize) / self.line_bytes) % self.num_sets;
        let tag = addr / (self.line_bytes * self.num_sets) as u64;
        (set_index, tag)
    }

    /// Checks if the cache contains the specified address.
    ///
    /// Pure lookup: neither the recency state nor the statistics change.
    pub fn contains(&self, addr: u64) -> bool {
        let (set_index, tag) = self.locate(addr);
        let base_idx = set_index * self.ways;

        (0..self.ways).any(|i| {
            let line = &self.lines[base_idx + i];
            line.valid && line.tag == tag
        })
    }

    /// Accesses the cache for the specified address.
    ///
    /// On a hit the line's replacement record is touched; on a miss a victim
    /// is selected, invalidated, and the slot refilled and reset for the new
    /// address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The address to access.
    /// * `is_write` - Whether this is a write operation (marks the line dirty).
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn access(&mut self, addr: u64, is_write: bool) -> bool {
        let (set_index, tag) = self.locate(addr);
        let base_idx = set_index * self.ways;
        self.stats.accesses += 1;

        for i in 0..self.ways {
            let idx = base_idx + i;
            if self.lines[idx].valid && self.lines[idx].tag == tag {
                self.policy.touch(&mut self.repl[idx]);
                if is_write {
                    self.lines[idx].dirty = true;
                }
                self.stats.hits += 1;
                return true;
            }
        }

        self.stats.misses += 1;
        self.install_line(set_index, tag, is_write);
        false
    }

    /// Installs a line for `tag` in `set_index`, evicting a victim if needed.
    fn install_line(&mut self, set_index: usize, tag: u64, is_write: bool) {
        let base_idx = set_index * self.ways;
        let way = self
            .policy
            .get_victim(&mut self.repl[base_idx..base_idx + self.ways]);
        let idx = base_idx + way;

        if self.lines[idx].valid {
            self.stats.evictions += 1;
            if self.lines[idx].dirty {
                self.stats.writebacks += 1;
            }
        }

        self.policy.invalidate(&mut self.repl[idx]);
        self.lines[idx] = CacheLine {
            tag,
            valid: true,
            dirty: is_write,
        };
        self.policy.reset(&mut self.repl[idx]);
    }

    /// Invalidates the line holding `addr`, if resident (coherence downgrade).
    ///
    /// A dirty line is counted as written back first.
    ///
    /// # Returns
    ///
    /// `true` if a resident line was invalidated.
    pub fn invalidate_address(&mut self, addr: u64) -> bool {
        let (set_index, tag) = self.locate(addr);
        let base_idx = set_index * self.ways;

        for i in 0..self.ways {
            let idx = base_idx + i;
            if self.lines[idx].valid && self.lines[idx].tag == tag {
                if self.lines[idx].dirty {
                    self.stats.writebacks += 1;
                }
                self.lines[idx].valid = false;
                self.lines[idx].dirty = false;
                self.stats.invalidations += 1;
                self.policy.invalidate(&mut self.repl[idx]);
                return true;
            }
        }
        false
    }

    /// Flushes all dirty cache lines, invalidating them.
    ///
    /// Clean lines stay resident; dirty lines are counted as written back and
    /// dropped, matching a write-back cache's flush operation.
    pub fn flush(&mut self) {
        for idx in 0..self.lines.len() {
            if self.lines[idx].valid && self.lines[idx].dirty {
                self.lines[idx].valid = false;
                self.lines[idx].dirty = false;
                self.stats.writebacks += 1;
                self.stats.invalidations += 1;
                self.policy.invalidate(&mut self.repl[idx]);
            }
        }
    }
}

impl<P: ReplacementPolicy + fmt::Debug> fmt::Debug for CacheSim<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSim")
            .field("num_sets", &self.num_sets)
            .field("ways", &self.ways)
            .field("line_bytes", &self.line_bytes)
            .field("policy", &self.policy)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
