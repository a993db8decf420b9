//! Cache Simulator Unit Tests.
//!
//! Verifies the set-associative harness end to end: hit/miss behavior,
//! the miss protocol against the shepherd policy, explicit invalidation,
//! flushing, and statistics counters. The cache is constructed directly from
//! `CacheConfig` — no driver binary needed.

use shepcache_core::cache::CacheSim;
use shepcache_core::cache::policies::{FifoPolicy, LruPolicy, ShepherdPolicy};
use shepcache_core::config::{CacheConfig, PolicyKind};
use shepcache_core::error::ConfigError;

// ──────────────────────────────────────────────────────────
// Helper: build a small deterministic test cache
// ──────────────────────────────────────────────────────────

/// Small shepherd-policy cache:
/// 512 bytes, 64-byte lines, 4-way, 2-way shepherd region.
///
/// With these parameters:
///   - num_lines = 512 / 64 = 8
///   - num_sets  = 8 / 4 = 2
///
/// Set index = (addr / 64) % 2
/// Tag       = addr / (64 * 2) = addr / 128
fn test_config() -> CacheConfig {
    CacheConfig {
        size_bytes: 512,
        line_bytes: 64,
        ways: 4,
        shepherd_ways: 2,
        policy: PolicyKind::Shepherd,
    }
}

/// A shepherd cache built from `test_config()`.
fn shepherd_cache() -> CacheSim<ShepherdPolicy> {
    let config = test_config();
    let policy = match ShepherdPolicy::from_config(&config) {
        Ok(p) => p,
        Err(err) => panic!("test config rejected: {err}"),
    };
    match CacheSim::new(&config, policy) {
        Ok(cache) => cache,
        Err(err) => panic!("test config rejected: {err}"),
    }
}

// Addresses all mapping to set 0 with distinct tags:
// (addr / 64) even → set 0; tag = addr / 128.
const A: u64 = 0; // tag 0
const B: u64 = 128; // tag 1
const C: u64 = 256; // tag 2
const D: u64 = 384; // tag 3
const E: u64 = 512; // tag 4

// ══════════════════════════════════════════════════════════
// 1. Cold Miss / Warm Hit
// ══════════════════════════════════════════════════════════

/// First access to any address is a compulsory (cold) miss.
#[test]
fn cold_miss() {
    let mut cache = shepherd_cache();
    assert!(!cache.access(0x1000, false), "first access should miss");
    assert_eq!(cache.stats.misses, 1);
}

/// Second access to the same address hits.
#[test]
fn warm_hit() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, false);
    assert!(cache.access(0x1000, false), "second access should hit");
    assert_eq!(cache.stats.hits, 1);
}

/// Access to a different offset within the same cache line hits.
#[test]
fn same_line_different_offset_hits() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, false);
    assert!(
        cache.access(0x1000 + 32, false),
        "different offset in same line should hit"
    );
}

// ══════════════════════════════════════════════════════════
// 2. Shepherd eviction through the harness
// ══════════════════════════════════════════════════════════

/// Filling a set past its associativity evicts the oldest *staged* line, not
/// the oldest line overall: the early fills have graduated to the main
/// region and survive the scan.
#[test]
fn conflict_eviction_takes_staged_line() {
    let mut cache = shepherd_cache();

    for addr in [A, B, C, D] {
        cache.access(addr, false);
    }
    // Staged now: C, D (A and B graduated). The fifth fill reclaims the
    // oldest untouched staged line — C.
    assert!(!cache.access(E, false));

    assert!(cache.contains(A), "graduated line must survive");
    assert!(cache.contains(B), "graduated line must survive");
    assert!(!cache.contains(C), "oldest staged line is evicted");
    assert!(cache.contains(D));
    assert!(cache.contains(E));
    assert_eq!(cache.stats.evictions, 1);
}

/// A hit on the staged head diverts eviction into the main region.
#[test]
fn reused_staged_line_survives_next_fill() {
    let mut cache = shepherd_cache();

    for addr in [A, B, C, D] {
        cache.access(addr, false);
    }
    // Reuse C before the next conflicting fill.
    cache.access(C, false);
    cache.access(E, false);

    assert!(cache.contains(C), "reused staged line must survive");
    assert!(
        !cache.contains(A),
        "an untouched main-region line goes instead"
    );
}

// ══════════════════════════════════════════════════════════
// 3. Policy seam: FIFO and LRU behind the same harness
// ══════════════════════════════════════════════════════════

/// 2-way FIFO cache: a hit does not protect the oldest line.
#[test]
fn fifo_harness_ignores_hits() {
    let config = CacheConfig {
        size_bytes: 256,
        line_bytes: 64,
        ways: 2,
        shepherd_ways: 1,
        policy: PolicyKind::Fifo,
    };
    let mut cache = match CacheSim::new(&config, FifoPolicy::new()) {
        Ok(cache) => cache,
        Err(err) => panic!("test config rejected: {err}"),
    };

    // Set 0 of 2; tags from addr / 128.
    cache.access(A, false);
    cache.access(B, false);
    cache.access(A, false); // hit; FIFO ignores it
    cache.access(C, false); // evicts A (inserted first)

    assert!(!cache.contains(A), "FIFO evicts the oldest insertion");
    assert!(cache.contains(B));
    assert!(cache.contains(C));
}

/// 2-way LRU cache: the same sequence protects the re-accessed line.
#[test]
fn lru_harness_respects_hits() {
    let config = CacheConfig {
        size_bytes: 256,
        line_bytes: 64,
        ways: 2,
        shepherd_ways: 1,
        policy: PolicyKind::Lru,
    };
    let mut cache = match CacheSim::new(&config, LruPolicy::new()) {
        Ok(cache) => cache,
        Err(err) => panic!("test config rejected: {err}"),
    };

    cache.access(A, false);
    cache.access(B, false);
    cache.access(A, false); // hit; A becomes most recent
    cache.access(C, false); // evicts B

    assert!(cache.contains(A), "LRU protects the re-accessed line");
    assert!(!cache.contains(B));
    assert!(cache.contains(C));
}

// ══════════════════════════════════════════════════════════
// 4. Invalidation and flush
// ══════════════════════════════════════════════════════════

/// Explicit invalidation drops a resident line and reports whether anything
/// was dropped.
#[test]
fn invalidate_address_drops_line() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, false);
    assert!(cache.contains(0x1000));

    assert!(cache.invalidate_address(0x1000));
    assert!(!cache.contains(0x1000));
    assert_eq!(cache.stats.invalidations, 1);

    // Not resident any more: reports false, counters unchanged.
    assert!(!cache.invalidate_address(0x1000));
    assert_eq!(cache.stats.invalidations, 1);
}

/// Invalidating a dirty line counts a write-back; a clean line does not.
#[test]
fn invalidate_address_writes_back_dirty_data() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, true);
    cache.access(0x2000, false);

    cache.invalidate_address(0x1000);
    cache.invalidate_address(0x2000);
    assert_eq!(cache.stats.writebacks, 1);
    assert_eq!(cache.stats.invalidations, 2);
}

/// After flushing, previously cached dirty lines miss again.
#[test]
fn flush_invalidates_dirty_lines() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, true);
    assert!(cache.contains(0x1000));

    cache.flush();

    assert!(!cache.contains(0x1000));
    assert_eq!(cache.stats.writebacks, 1);
}

/// Flush only drops dirty lines; clean lines survive.
#[test]
fn flush_preserves_clean_lines() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, false);
    assert!(cache.contains(0x1000));

    cache.flush();

    assert!(cache.contains(0x1000), "clean lines should survive flush");
    assert_eq!(cache.stats.writebacks, 0);
}

/// An invalidated way is refilled before any live line is evicted.
#[test]
fn invalidated_way_is_refilled_first() {
    let mut cache = shepherd_cache();
    for addr in [A, B, C, D] {
        cache.access(addr, false);
    }
    cache.invalidate_address(B);

    // The next conflicting fill reuses B's slot; everything else survives.
    cache.access(E, false);
    assert!(cache.contains(A));
    assert!(cache.contains(C));
    assert!(cache.contains(D));
    assert!(cache.contains(E));
    assert_eq!(cache.stats.evictions, 0, "no live line was displaced");
}

// ══════════════════════════════════════════════════════════
// 5. Statistics and lookup purity
// ══════════════════════════════════════════════════════════

/// Accesses split exactly into hits and misses.
#[test]
fn stats_accesses_split_into_hits_and_misses() {
    let mut cache = shepherd_cache();
    for addr in [A, B, A, C, B, A, E, E] {
        cache.access(addr, false);
    }
    assert_eq!(cache.stats.accesses, 8);
    assert_eq!(
        cache.stats.hits + cache.stats.misses,
        cache.stats.accesses
    );
    let rate = cache.stats.hit_rate();
    assert!((0.0..=1.0).contains(&rate));
}

/// `contains` is a pure lookup: no counter moves, no recency update.
#[test]
fn contains_does_not_perturb_state() {
    let mut cache = shepherd_cache();
    cache.access(0x1000, false);
    let accesses_before = cache.stats.accesses;

    for _ in 0..10 {
        cache.contains(0x1000);
        cache.contains(0x9999);
    }
    assert_eq!(cache.stats.accesses, accesses_before);
}

// ══════════════════════════════════════════════════════════
// 6. Construction errors
// ══════════════════════════════════════════════════════════

/// Degenerate geometry is rejected, never clamped.
#[test]
fn zero_geometry_rejected() {
    let config = CacheConfig {
        size_bytes: 0,
        ..test_config()
    };
    assert_eq!(
        CacheSim::new(&config, FifoPolicy::new()).err(),
        Some(ConfigError::ZeroGeometry {
            size_bytes: 0,
            line_bytes: 64,
            ways: 4
        })
    );
}

/// A capacity that does not split into whole sets is rejected.
#[test]
fn misaligned_geometry_rejected() {
    let config = CacheConfig {
        size_bytes: 300,
        ..test_config()
    };
    assert!(matches!(
        CacheSim::new(&config, FifoPolicy::new()).err(),
        Some(ConfigError::MisalignedGeometry { .. })
    ));
}

/// A shepherd region as large as the set is rejected at construction.
#[test]
fn oversized_shepherd_region_rejected() {
    let config = CacheConfig {
        ways: 2,
        shepherd_ways: 4,
        ..test_config()
    };
    assert!(matches!(
        ShepherdPolicy::from_config(&config).err(),
        Some(ConfigError::ShepherdRegion {
            shepherd_ways: 4,
            ways: 2
        })
    ));
}
