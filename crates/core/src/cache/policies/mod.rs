//! Cache Replacement Policies.
//!
//! Implements victim selection for set-associative caches over per-line
//! replacement records.
//!
//! # Policies
//!
//! - `Shepherd`: FIFO staging region + NRU main region (the featured policy).
//! - `Fifo`: First-In, First-Out by insertion tick.
//! - `Lru`: Least Recently Used by access tick.
//! - `Random`: LFSR-driven random selection.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Random replacement policy.
pub mod random;

/// Shepherd (FIFO staging + NRU) replacement policy.
pub mod shepherd;

pub use fifo::{FifoLine, FifoPolicy};
pub use lru::{LruLine, LruPolicy};
pub use random::{RandomLine, RandomPolicy};
pub use shepherd::{ShepherdLine, ShepherdPolicy};

use core::fmt;

/// Logical time for ordering insertions and touches.
///
/// One policy instance owns one counter; it advances on every
/// externally-visible operation and never wraps in practice (a `u64` at one
/// tick per access outlives any simulation).
pub type Tick = u64;

/// Capability interface a replacement policy offers its cache controller.
///
/// Each policy defines its own per-line record type and four bookkeeping
/// operations plus victim selection. The controller owns the records (one per
/// way) and passes the accessed record, or the full candidate slice of one
/// congruence class, back into the policy:
///
/// - on a hit, call [`touch`](Self::touch) with the hit line's record;
/// - on a miss needing eviction, call [`get_victim`](Self::get_victim) with
///   the set's records, then [`invalidate`](Self::invalidate) the returned
///   record;
/// - after the fill, call [`reset`](Self::reset) on the filled record;
/// - on an explicit invalidation (flush, coherence downgrade), call
///   [`invalidate`](Self::invalidate).
pub trait ReplacementPolicy {
    /// Per-line replacement record maintained for this policy.
    type Line: fmt::Debug;

    /// Creates one fresh (invalid) replacement record.
    ///
    /// Called once per way when the cache storage is built.
    fn instantiate(&self) -> Self::Line;

    /// Marks a line as holding no live data.
    ///
    /// Invalidated lines are preferred victims on the next selection.
    fn invalidate(&mut self, line: &mut Self::Line);

    /// Updates a line's recency state on a hit.
    fn touch(&mut self, line: &mut Self::Line);

    /// Re-initializes a line's record on insertion (fill after a miss).
    fn reset(&mut self, line: &mut Self::Line);

    /// Selects a victim among the candidate records of one congruence class.
    ///
    /// # Arguments
    ///
    /// * `candidates` - The records of every way in the target set.
    ///
    /// # Returns
    ///
    /// The index within `candidates` of the record designated for eviction.
    ///
    /// # Panics
    ///
    /// Panics if `candidates` is empty; selecting a victim from nothing is a
    /// caller error with no recovery. Policies may impose further contracts
    /// (the shepherd policy also requires `candidates.len()` to exceed its
    /// staging capacity).
    fn get_victim(&mut self, candidates: &mut [Self::Line]) -> usize;
}
