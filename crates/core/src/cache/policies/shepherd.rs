//! Shepherd Replacement Policy.
//!
//! This policy partitions each set into a small FIFO-ordered "shepherd"
//! staging region and a larger main region governed by NRU-style recency
//! bits. Every fill enters the shepherd region. A staged line that is reused
//! before a newer fill displaces it graduates into the main region; one that
//! is not is reclaimed directly, so one-shot streaming fills never pollute
//! the main region. Main-region lines carry a bounded recency history and
//! are evicted untouched-first; among touched competitors the line touched
//! *latest* is evicted, a deliberate inversion of LRU that protects the
//! established working set.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()`: O(K) where K is the shepherd capacity
//!   - `reset()` / `invalidate()`: O(K) / O(1)
//!   - `get_victim()`: O(W × K) where W is the associativity
//! - **Space Complexity:** O(W × K) bits plus one tick per history column
//! - **Hardware Cost:** Moderate - per-line recency columns and one global tick
//! - **Best Case:** Scanning workloads mixed with a stable working set
//! - **Worst Case:** Uniformly random accesses (staging adds no information)

use super::{ReplacementPolicy, Tick};
use crate::config::CacheConfig;
use crate::error::ConfigError;

/// Per-line replacement record for the shepherd policy.
///
/// Pure bookkeeping: the record exposes its fields and holds no algorithmic
/// behavior of its own. All invariants across records of one set are
/// maintained by [`ShepherdPolicy`].
#[derive(Debug, Clone)]
pub struct ShepherdLine {
    /// Whether the line currently holds live data.
    pub valid: bool,
    /// Whether the line currently sits in the shepherd (staging) region.
    ///
    /// Deliberately left set when the policy invalidates a line: an invalid
    /// line that still carries the flag is recognized and refilled before
    /// shepherd slots are redistributed.
    pub shepherd: bool,
    /// Tick of the line's most recent insertion; orders shepherd members
    /// oldest-first.
    pub tick_inserted: Tick,
    /// Recency flags, one column per shepherd way. Column 0 is the oldest
    /// surviving generation; the trailing column is the current one. Columns
    /// retire (shift left) when a full shepherd region graduates a member.
    pub touched: Box<[bool]>,
    /// Tick at which each recency column was marked, parallel to `touched`.
    pub tick_touched: Box<[Tick]>,
    /// Count of valid shepherd lines in this line's set, refreshed at the
    /// start of every victim selection. Carried per line because the storage
    /// model keeps no set-level object.
    pub shepherd_count: u32,
}

impl ShepherdLine {
    /// Creates a fresh invalid record with `depth` history columns.
    fn new(depth: usize) -> Self {
        Self {
            valid: false,
            shepherd: false,
            tick_inserted: 0,
            touched: vec![false; depth].into_boxed_slice(),
            tick_touched: vec![0; depth].into_boxed_slice(),
            shepherd_count: 0,
        }
    }

    /// Number of recency columns this record carries (the shepherd capacity).
    pub fn history_depth(&self) -> usize {
        self.touched.len()
    }

    /// Clears every recency column.
    pub(crate) fn clear_history(&mut self) {
        self.touched.fill(false);
        self.tick_touched.fill(0);
    }

    /// Retires the oldest recency column: shifts every column left by one
    /// and clears the vacated trailing column.
    pub(crate) fn shift_history(&mut self) {
        let last = self.touched.len() - 1;
        self.touched.copy_within(1.., 0);
        self.tick_touched.copy_within(1.., 0);
        self.touched[last] = false;
        self.tick_touched[last] = 0;
    }
}

/// Shepherd policy state: the capacities and the global tick counter.
///
/// One instance serves every set of a cache level; per-line state lives in
/// the [`ShepherdLine`] records owned by the cache storage. The counter
/// advances once per operation and totally orders insertions and touches, so
/// two events can never tie.
#[derive(Debug)]
pub struct ShepherdPolicy {
    /// Associativity of the attached cache.
    ways: usize,
    /// Shepherd-region capacity per set; strictly smaller than `ways`.
    shepherd_ways: usize,
    /// Monotonic logical clock shared by every set this policy serves.
    tick: Tick,
}

impl ShepherdPolicy {
    /// Creates a shepherd policy for a cache with the given associativity.
    ///
    /// # Arguments
    ///
    /// * `ways` - Associativity of the cache this policy is attached to.
    /// * `shepherd_ways` - Capacity of the staging region per set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ShepherdRegion`] unless
    /// `1 <= shepherd_ways < ways`; a staging region as large as the set
    /// would leave no main region to graduate into.
    pub fn new(ways: usize, shepherd_ways: usize) -> Result<Self, ConfigError> {
        if shepherd_ways == 0 || shepherd_ways >= ways {
            return Err(ConfigError::ShepherdRegion {
                shepherd_ways,
                ways,
            });
        }
        tracing::debug!(ways, shepherd_ways, "shepherd policy constructed");
        Ok(Self {
            ways,
            shepherd_ways,
            tick: 0,
        })
    }

    /// Creates a shepherd policy from a validated cache configuration.
    ///
    /// # Errors
    ///
    /// Propagates any [`ConfigError`] reported by
    /// [`CacheConfig::validate`].
    pub fn from_config(config: &CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::new(config.ways, config.shepherd_ways)
    }

    /// Configured associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Configured shepherd-region capacity.
    pub const fn shepherd_ways(&self) -> usize {
        self.shepherd_ways
    }
}

/// Index of the valid shepherd member with the smallest insertion tick.
///
/// Insertion ticks are strictly ordered (the counter advances on every
/// reset), so the minimum is unique when it exists.
fn oldest_shepherd(candidates: &[ShepherdLine]) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, line)| line.valid && line.shepherd)
        .min_by_key(|(_, line)| line.tick_inserted)
        .map(|(idx, _)| idx)
}

/// NRU scan over the valid main-region candidates.
///
/// Returns the first untouched line; failing that, the touched line with the
/// latest first-column stamp. An all-shepherd set cannot occur once the
/// population bound holds, so `oldest` only backstops the scan when the main
/// region is empty.
fn nru_scan(candidates: &[ShepherdLine], oldest: Option<usize>) -> usize {
    let mut fallback: Option<usize> = None;
    for (idx, line) in candidates.iter().enumerate() {
        if !line.valid || line.shepherd {
            continue;
        }
        if !line.touched[0] {
            return idx;
        }
        if fallback.is_none_or(|f| line.tick_touched[0] > candidates[f].tick_touched[0]) {
            fallback = Some(idx);
        }
    }
    match fallback.or(oldest) {
        Some(idx) => idx,
        None => unreachable!("a fully valid candidate set holds at least one line"),
    }
}

impl ReplacementPolicy for ShepherdPolicy {
    type Line = ShepherdLine;

    /// Creates one invalid record with a history column per shepherd way.
    fn instantiate(&self) -> ShepherdLine {
        ShepherdLine::new(self.shepherd_ways)
    }

    /// Clears `valid` only.
    ///
    /// The shepherd flag, insertion tick, and recency history survive so the
    /// slot is recognized and reused before shepherd slots are
    /// redistributed. The counter still advances: invalidations are totally
    /// ordered against other operations even though no eviction math reads
    /// the tick.
    fn invalidate(&mut self, line: &mut ShepherdLine) {
        self.tick += 1;
        line.valid = false;
    }

    /// Marks every unset recency column in `0..shepherd_count`.
    ///
    /// All open columns are stamped with one tick, which is what makes a
    /// repeat touch within the same generation a no-op: further touches find
    /// nothing unset until an eviction elsewhere in the set retires a column
    /// and opens the trailing one.
    fn touch(&mut self, line: &mut ShepherdLine) {
        self.tick += 1;
        let window = line.shepherd_count as usize;
        for (flag, stamp) in line
            .touched
            .iter_mut()
            .zip(line.tick_touched.iter_mut())
            .take(window)
        {
            if !*flag {
                *flag = true;
                *stamp = self.tick;
            }
        }
    }

    /// Re-initializes a record on fill: valid, staged, freshly stamped, with
    /// a cleared history.
    fn reset(&mut self, line: &mut ShepherdLine) {
        self.tick += 1;
        line.valid = true;
        line.shepherd = true;
        line.tick_inserted = self.tick;
        line.clear_history();
    }

    /// Selects the victim for one congruence class.
    ///
    /// In order, short-circuiting on the first match: any invalid line; the
    /// oldest shepherd member if it was never touched; an untouched
    /// main-region line; the main-region line touched latest. Afterwards, if
    /// the shepherd region was full, its oldest member graduates (loses the
    /// staging flag) and every candidate retires one recency column — making
    /// room for the `reset` that completes the miss without breaching the
    /// population bound.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty, if the shepherd region is not
    /// strictly smaller than the candidate count, or if more than
    /// `shepherd_ways` valid shepherd lines are observed — all three are
    /// caller protocol violations that would corrupt the FIFO ordering if
    /// execution continued.
    fn get_victim(&mut self, candidates: &mut [ShepherdLine]) -> usize {
        assert!(
            !candidates.is_empty(),
            "victim selection requires at least one candidate"
        );
        assert!(
            candidates.len() > self.shepherd_ways,
            "a {}-way candidate set cannot host a {}-way shepherd region",
            candidates.len(),
            self.shepherd_ways
        );

        // Refresh the per-line population hint before anything reads it.
        let shepherds = candidates
            .iter()
            .filter(|line| line.valid && line.shepherd)
            .count();
        assert!(
            shepherds <= self.shepherd_ways,
            "{shepherds} valid shepherd lines exceed the {}-way region; the fill protocol was violated",
            self.shepherd_ways
        );
        for line in candidates.iter_mut() {
            line.shepherd_count = shepherds as u32;
        }

        let oldest = oldest_shepherd(candidates);

        let (victim, cause) = if let Some(idx) = candidates.iter().position(|line| !line.valid) {
            // An empty slot always wins over evicting live data.
            (idx, "invalid")
        } else if let Some(idx) = oldest.filter(|&i| !candidates[i].touched[0]) {
            // A staged line that was never reused is reclaimed immediately.
            (idx, "untouched-shepherd")
        } else {
            (nru_scan(candidates, oldest), "main-region")
        };

        // A full shepherd region graduates its oldest member ahead of the
        // upcoming fill, and the set retires one recency generation.
        if shepherds == self.shepherd_ways {
            if let Some(idx) = oldest {
                candidates[idx].shepherd = false;
                for line in candidates.iter_mut() {
                    line.shift_history();
                }
            }
        }

        tracing::trace!(victim, cause, shepherds, "selected eviction victim");
        victim
    }
}
