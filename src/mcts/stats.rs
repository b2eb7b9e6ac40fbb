//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,

    /// Nodes added to the tree.
    pub nodes_expanded: u32,

    /// Rollouts played.
    pub simulations: u32,

    /// Iterations that ended on a terminal node already in the tree.
    pub terminal_hits: u32,

    /// Deepest node created, relative to the search root.
    pub max_depth: u16,

    /// Best reward any iteration produced.
    pub best_reward: Option<f64>,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Note a reward seen by an iteration.
    pub fn observe(&mut self, reward: f64) {
        if self.best_reward.map_or(true, |best| reward > best) {
            self.best_reward = Some(reward);
        }
    }

    pub fn observe_depth(&mut self, depth: u16) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.iterations) / (self.time_us as f64 / 1_000_000.0)
        }
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} iterations, {} nodes, {} rollouts, depth {}, best {}, {:.1} ms",
            self.iterations,
            self.nodes_expanded,
            self.simulations,
            self.max_depth,
            self.best_reward.map_or_else(|| "-".to_string(), |r| format!("{:.3}", r)),
            self.time_us as f64 / 1000.0
        )
    }
}
