//! Depth-first tree walker.
//!
//! Enumerates a process tree with an explicit stack. Each frame keeps the
//! actions it has not tried yet; a frame is popped (and its state dropped)
//! as soon as its last action has been tried, so memory stays proportional
//! to depth rather than tree size.
//!
//! With a `playout_threshold`, the walk turns hybrid: once that many nodes
//! have been visited, newly reached nodes get one random playout instead of
//! being expanded.

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::rules::DecisionProcess;

use super::error::SearchError;
use super::policy::{RandomRollout, RolloutPolicy};

/// Walker settings. Zero disables a limit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Stop after visiting this many nodes.
    pub step_limit: u64,

    /// Visited nodes after which new nodes are played out, not expanded.
    pub playout_threshold: u64,

    /// Log progress every this many visited nodes.
    pub report_interval: u64,

    pub max_rollout_depth: u32,
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            step_limit: 0,
            playout_threshold: 0,
            report_interval: 100_000,
            max_rollout_depth: 0,
            seed: 42,
        }
    }
}

impl WalkConfig {
    pub fn with_step_limit(mut self, steps: u64) -> Self {
        self.step_limit = steps;
        self
    }

    pub fn with_playout_threshold(mut self, visited: u64) -> Self {
        self.playout_threshold = visited;
        self
    }

    pub fn with_report_interval(mut self, visited: u64) -> Self {
        self.report_interval = visited;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Result of a walk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalkStats {
    /// Nodes generated, including the root and children not yet entered.
    pub discovered_nodes: u64,
    /// Nodes entered.
    pub visited_nodes: u64,
    pub discovered_terminals: u64,
    pub playouts: u64,
    /// Best terminal or playout reward seen.
    pub max_reward: Option<f64>,
    /// Actions from the root to where `max_reward` was seen.
    pub best_line: Vec<usize>,
    /// False if the step limit cut the walk short.
    pub complete: bool,
}

impl WalkStats {
    fn record(&mut self, reward: f64, line: &[usize]) {
        if self.max_reward.map_or(true, |best| reward > best) {
            self.max_reward = Some(reward);
            self.best_line = line.to_vec();
        }
    }
}

impl std::fmt::Display for WalkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "discovered {} nodes, visited {}, {} terminals, {} playouts, best {}",
            self.discovered_nodes,
            self.visited_nodes,
            self.discovered_terminals,
            self.playouts,
            self.max_reward.map_or_else(|| "-".to_string(), |r| format!("{:.3}", r)),
        )
    }
}

struct Frame<P> {
    state: P,
    untried: Vec<usize>,
}

impl<P: DecisionProcess> Frame<P> {
    fn new(state: P) -> Result<Self, SearchError> {
        let mut untried = state.legal_actions();
        if untried.is_empty() {
            return Err(SearchError::NoLegalActions);
        }
        // Popped from the back, so reverse to try actions in order.
        untried.reverse();
        Ok(Self { state, untried })
    }
}

pub struct TreeWalker<P, R = RandomRollout> {
    config: WalkConfig,
    rollout: R,
    rng: GameRng,
    _process: std::marker::PhantomData<fn(P)>,
}

impl<P: DecisionProcess> TreeWalker<P> {
    pub fn new(config: WalkConfig) -> Self {
        Self::with_rollout(config, RandomRollout)
    }
}

impl<P: DecisionProcess, R: RolloutPolicy<P>> TreeWalker<P, R> {
    pub fn with_rollout(config: WalkConfig, rollout: R) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rollout, rng, _process: std::marker::PhantomData }
    }

    pub fn walk(&mut self, root: P) -> Result<WalkStats, SearchError> {
        let mut stats = WalkStats {
            discovered_nodes: 1,
            visited_nodes: 1,
            ..WalkStats::default()
        };

        if root.is_terminal() {
            stats.discovered_terminals = 1;
            stats.record(root.reward().unwrap_or(0.0), &[]);
            stats.complete = true;
            return Ok(stats);
        }

        let first = Frame::new(root)?;
        stats.discovered_nodes += first.untried.len() as u64;
        let mut stack = vec![first];
        let mut path: Vec<usize> = Vec::new();

        loop {
            let Some(frame) = stack.last_mut() else {
                stats.complete = true;
                break;
            };
            let Some(action) = frame.untried.pop() else {
                stack.pop();
                path.pop();
                continue;
            };
            if self.config.step_limit > 0 && stats.visited_nodes >= self.config.step_limit {
                break;
            }

            let child = frame
                .state
                .apply(action)
                .ok_or(SearchError::InvalidAction(action))?;
            path.push(action);
            stats.visited_nodes += 1;
            self.report(&stats);

            if child.is_terminal() {
                stats.discovered_terminals += 1;
                stats.record(child.reward().unwrap_or(0.0), &path);
                path.pop();
                continue;
            }

            let threshold = self.config.playout_threshold;
            if threshold > 0 && stats.visited_nodes > threshold {
                let rollout =
                    self.rollout
                        .simulate(child, &mut self.rng, self.config.max_rollout_depth)?;
                stats.playouts += 1;
                stats.record(rollout.reward, &path);
                path.pop();
                continue;
            }

            let frame = Frame::new(child)?;
            stats.discovered_nodes += frame.untried.len() as u64;
            stack.push(frame);
        }

        log::info!("walk finished: {}", stats);
        Ok(stats)
    }

    fn report(&self, stats: &WalkStats) {
        let interval = self.config.report_interval;
        if interval > 0 && stats.visited_nodes % interval == 0 {
            log::info!("walk: {}", stats);
        }
    }
}
