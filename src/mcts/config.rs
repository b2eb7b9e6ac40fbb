//! Search configuration parameters.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// How long a search runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Budget {
    /// Wall-clock time, checked between iterations.
    Time(Duration),
    /// A fixed number of iterations. Deterministic for a fixed seed.
    Iterations(u32),
}

impl Default for Budget {
    fn default() -> Self {
        Budget::Time(Duration::from_secs(1))
    }
}

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// When to stop searching.
    pub budget: Budget,

    /// UCT exploration constant `c` in `c * sqrt(2 ln N / n)`
    /// (default: 1/sqrt(2)). Higher values favor exploration.
    pub exploration_constant: f64,

    /// SP-MCTS smoothing constant `D` added to the variance term.
    /// Large values keep rarely visited children attractive.
    pub smoothing: f64,

    /// SP-MCTS: visits a node needs before it is expanded.
    pub visit_threshold: u32,

    /// Maximum rollout length (0 = until terminal). Cut-off rollouts are
    /// scored with the process heuristic.
    pub max_rollout_depth: u32,

    /// Random seed for expansion, tie-breaks and rollouts.
    /// Same seed and an iteration budget produce identical searches.
    pub seed: u64,

    /// Iterations between progress lines at debug level (0 = off).
    pub report_interval: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: Budget::default(),
            exploration_constant: std::f64::consts::FRAC_1_SQRT_2,
            smoothing: 0.1,
            visit_threshold: 1,
            max_rollout_depth: 0,
            seed: 42,
            report_interval: 0,
        }
    }
}

impl SearchConfig {
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_iterations(self, iterations: u32) -> Self {
        self.with_budget(Budget::Iterations(iterations))
    }

    pub fn with_time(self, time: Duration) -> Self {
        self.with_budget(Budget::Time(time))
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    pub fn with_smoothing(mut self, d: f64) -> Self {
        self.smoothing = d;
        self
    }

    pub fn with_visit_threshold(mut self, visits: u32) -> Self {
        self.visit_threshold = visits;
        self
    }

    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_report_interval(mut self, iterations: u32) -> Self {
        self.report_interval = iterations;
        self
    }
}

/// Tracks a running search against its budget.
#[derive(Clone, Debug)]
pub struct BudgetClock {
    budget: Budget,
    started: Instant,
    iterations: u32,
}

impl BudgetClock {
    #[must_use]
    pub fn start(budget: Budget) -> Self {
        Self { budget, started: Instant::now(), iterations: 0 }
    }

    /// Count one finished iteration.
    pub fn tick(&mut self) {
        self.iterations += 1;
    }

    #[must_use]
    pub fn exhausted(&self) -> bool {
        match self.budget {
            Budget::Time(limit) => self.started.elapsed() >= limit,
            Budget::Iterations(limit) => self.iterations >= limit,
        }
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.exploration_constant - 0.7071).abs() < 0.001);
        assert_eq!(config.visit_threshold, 1);
        assert_eq!(config.max_rollout_depth, 0);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_iterations(500)
            .with_exploration(2.0)
            .with_smoothing(10.0)
            .with_seed(123);

        assert_eq!(config.budget, Budget::Iterations(500));
        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.smoothing, 10.0);
        assert_eq!(config.seed, 123);
    }

    #[test]
    fn test_iteration_clock() {
        let mut clock = BudgetClock::start(Budget::Iterations(2));
        assert!(!clock.exhausted());
        clock.tick();
        clock.tick();
        assert!(clock.exhausted());
        assert_eq!(clock.iterations(), 2);

        assert!(BudgetClock::start(Budget::Time(Duration::ZERO)).exhausted());
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_time(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
