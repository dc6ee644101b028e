//! Tree-walk statistics for diagnostics and benchmarks.

use serde::{Deserialize, Serialize};

/// Counters collected while walking a move tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Moves made (and unmade).
    pub nodes: u64,

    /// Positions at the depth limit.
    pub leaves: u64,

    /// Positions where the game was over before the depth limit.
    pub terminals: u64,

    /// Deepest ply reached.
    pub max_depth: u32,

    /// Wall time (microseconds).
    pub time_us: u64,
}

impl WalkStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves per second.
    #[must_use]
    pub fn nodes_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.nodes as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    pub(crate) fn reached(&mut self, depth: u32) {
        self.max_depth = self.max_depth.max(depth);
    }
}
