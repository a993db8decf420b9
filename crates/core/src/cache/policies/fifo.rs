//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the line with the oldest insertion tick, regardless of
//! how recently it was accessed. Invalid lines are preferred over evicting
//! live data.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `reset()` / `invalidate()`: O(1)
//!   - `get_victim()`: O(W) where W is the number of ways (associativity)
//! - **Space Complexity:** O(W) ticks per set
//! - **Hardware Cost:** Minimal - one timestamp per line
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::{ReplacementPolicy, Tick};

/// Per-line replacement record for the FIFO policy.
#[derive(Debug, Clone, Default)]
pub struct FifoLine {
    /// Whether the line currently holds live data.
    pub valid: bool,
    /// Tick of the line's most recent insertion.
    pub tick_inserted: Tick,
}

/// FIFO policy state: the global insertion clock.
#[derive(Debug, Default)]
pub struct FifoPolicy {
    tick: Tick,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }
}

impl ReplacementPolicy for FifoPolicy {
    type Line = FifoLine;

    fn instantiate(&self) -> FifoLine {
        FifoLine::default()
    }

    fn invalidate(&mut self, line: &mut FifoLine) {
        self.tick += 1;
        line.valid = false;
    }

    /// Hits do not reorder a FIFO queue; this is a no-op.
    fn touch(&mut self, _line: &mut FifoLine) {}

    fn reset(&mut self, line: &mut FifoLine) {
        self.tick += 1;
        line.valid = true;
        line.tick_inserted = self.tick;
    }

    /// Returns any invalid line, else the line inserted earliest.
    fn get_victim(&mut self, candidates: &mut [FifoLine]) -> usize {
        assert!(
            !candidates.is_empty(),
            "victim selection requires at least one candidate"
        );
        if let Some(idx) = candidates.iter().position(|line| !line.valid) {
            return idx;
        }
        let mut victim = 0;
        for (idx, line) in candidates.iter().enumerate() {
            if line.tick_inserted < candidates[victim].tick_inserted {
                victim = idx;
            }
        }
        victim
    }
}
