//! UCT search.
//!
//! Classic MCTS over a `DecisionProcess`: descend by UCT through fully
//! expanded nodes, expand one untried action chosen uniformly, play out with
//! the rollout policy and add the result to every node back up to the root.

use std::time::Instant;

use crate::core::GameRng;
use crate::rules::DecisionProcess;

use super::config::{BudgetClock, SearchConfig};
use super::error::SearchError;
use super::policy::{select_child, RandomRollout, Rollout, RolloutPolicy, Uct};
use super::stats::SearchStats;
use super::tree::Tree;

/// UCT search context.
///
/// Owns the configuration, the RNG and the tree of the last search.
pub struct Mcts<P: DecisionProcess, R = RandomRollout> {
    config: SearchConfig,
    rollout: R,
    rng: GameRng,
    tree: Option<Tree<P>>,
    stats: SearchStats,
}

impl<P: DecisionProcess> Mcts<P> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rollout(config, RandomRollout)
    }
}

impl<P: DecisionProcess, R: RolloutPolicy<P>> Mcts<P, R> {
    pub fn with_rollout(config: SearchConfig, rollout: R) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rollout, rng, tree: None, stats: SearchStats::default() }
    }

    /// Search from `root` until the budget runs out and return the best
    /// action index.
    pub fn search(&mut self, root: P) -> Result<usize, SearchError> {
        let start = Instant::now();
        self.stats.reset();

        let mut tree = Tree::new(root)?;
        if tree.root_node().is_terminal {
            return Err(SearchError::TerminalRoot);
        }

        let mut clock = BudgetClock::start(self.config.budget);
        while !clock.exhausted() {
            self.iteration(&mut tree)?;
            clock.tick();
            self.stats.iterations += 1;
            let interval = self.config.report_interval;
            if interval > 0 && self.stats.iterations % interval == 0 {
                log::debug!("mcts: {}", self.stats);
            }
        }
        self.stats.time_us = start.elapsed().as_micros() as u64;
        self.tree = Some(tree);

        let action = self.best_action()?;
        log::debug!("mcts chose action {}: {}", action, self.stats);
        Ok(action)
    }

    /// One select, expand, rollout, backpropagate round.
    fn iteration(&mut self, tree: &mut Tree<P>) -> Result<(), SearchError> {
        let policy = Uct { exploration: self.config.exploration_constant };
        let mut current = tree.root();

        while tree.get(current).is_fully_expanded() && !tree.get(current).is_terminal {
            current = select_child(tree, current, &policy, &mut self.rng)
                .ok_or(SearchError::NoLegalActions)?;
        }

        let node = tree.get(current);
        let rollout = if node.is_terminal {
            self.stats.terminal_hits += 1;
            Rollout { reward: node.state.reward().unwrap_or(0.0), steps: 0 }
        } else {
            let pick = self.rng.gen_range_usize(0..node.untried.len());
            let action = node.untried[pick];
            current = tree.expand(current, action)?;
            self.stats.nodes_expanded += 1;
            self.stats.observe_depth(tree.get(current).depth - tree.root_node().depth);

            let state = tree.get(current).state.clone();
            self.stats.simulations += 1;
            self.rollout
                .simulate(state, &mut self.rng, self.config.max_rollout_depth)?
        };

        self.stats.observe(rollout.reward);
        tree.backpropagate(current, rollout.reward, rollout.steps);
        Ok(())
    }

    /// Best root action by mean reward (no exploration), ties at random.
    ///
    /// Falls back to a random legal action if nothing was expanded.
    pub fn best_action(&mut self) -> Result<usize, SearchError> {
        let tree = self.tree.as_ref().ok_or(SearchError::NoTree)?;
        let root = tree.root();
        let greedy = Uct { exploration: 0.0 };
        if let Some(child) = select_child(tree, root, &greedy, &mut self.rng) {
            return tree.get(child).action.ok_or(SearchError::NoTree);
        }
        self.rng
            .choose(&tree.root_node().untried)
            .copied()
            .ok_or(SearchError::NoLegalActions)
    }

    /// (action, visits) for every expanded root child.
    #[must_use]
    pub fn action_visits(&self) -> Vec<(usize, u32)> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.root_node()
            .children
            .iter()
            .map(|e| (e.action, tree.get(e.child).stats.visits))
            .collect()
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> Option<&Tree<P>> {
        self.tree.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}
