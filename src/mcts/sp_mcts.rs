//! Single-player MCTS.
//!
//! UCT with an extra variance term in selection, a visit threshold before a
//! node is expanded, and per-node best-reward tracking. Because the best
//! line found so far is remembered, the caller can commit one action at a
//! time (`advance`) and keep searching from the new root with everything
//! learned below it, or follow `best_line` without further search.
//!
//! `meta_search` runs several short searches from the same root, each with
//! its own RNG stream, and keeps the tree that found the best reward.

use std::time::Instant;

use crate::core::GameRng;
use crate::rules::DecisionProcess;

use super::config::{Budget, BudgetClock, SearchConfig};
use super::error::SearchError;
use super::node::NodeId;
use super::policy::{select_child, RandomRollout, Rollout, RolloutPolicy, SinglePlayerUct};
use super::stats::SearchStats;
use super::tree::Tree;

pub struct SpMcts<P: DecisionProcess, R = RandomRollout> {
    config: SearchConfig,
    rollout: R,
    rng: GameRng,
    tree: Option<Tree<P>>,
    stats: SearchStats,
}

impl<P: DecisionProcess> SpMcts<P> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_rollout(config, RandomRollout)
    }
}

impl<P: DecisionProcess, R: RolloutPolicy<P> + Clone> SpMcts<P, R> {
    pub fn with_rollout(config: SearchConfig, rollout: R) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rollout, rng, tree: None, stats: SearchStats::default() }
    }

    /// Start a fresh tree at `root`, search it and return the best action.
    pub fn search(&mut self, root: P) -> Result<usize, SearchError> {
        let tree = Tree::new(root)?;
        if tree.root_node().is_terminal {
            return Err(SearchError::TerminalRoot);
        }
        self.tree = Some(tree);
        self.run()?;
        self.best_action()
    }

    /// Keep searching the current tree for another budget.
    pub fn run(&mut self) -> Result<(), SearchError> {
        let start = Instant::now();
        self.stats.reset();
        let mut tree = self.tree.take().ok_or(SearchError::NoTree)?;

        let mut clock = BudgetClock::start(self.config.budget);
        let mut result = Ok(());
        while !clock.exhausted() && !tree.root_node().is_terminal {
            if let Err(err) = self.iteration(&mut tree) {
                result = Err(err);
                break;
            }
            clock.tick();
            self.stats.iterations += 1;
            let interval = self.config.report_interval;
            if interval > 0 && self.stats.iterations % interval == 0 {
                log::debug!("sp-mcts: {}", self.stats);
            }
        }
        self.stats.time_us = start.elapsed().as_micros() as u64;
        log::debug!(
            "sp-mcts at depth {}: {}",
            tree.root_node().depth,
            self.stats
        );
        self.tree = Some(tree);
        result
    }

    fn iteration(&mut self, tree: &mut Tree<P>) -> Result<(), SearchError> {
        let policy = SinglePlayerUct {
            exploration: self.config.exploration_constant,
            smoothing: self.config.smoothing,
        };
        let root = tree.root();
        let mut current = root;

        loop {
            let node = tree.get(current);
            if node.is_terminal {
                break;
            }
            if current != root && node.stats.visits < self.config.visit_threshold {
                break;
            }
            if !node.untried.is_empty() {
                let pick = self.rng.gen_range_usize(0..node.untried.len());
                let action = node.untried[pick];
                current = tree.expand(current, action)?;
                self.stats.nodes_expanded += 1;
                self.stats.observe_depth(tree.get(current).depth - tree.get(root).depth);
                break;
            }
            current = select_child(tree, current, &policy, &mut self.rng)
                .ok_or(SearchError::NoLegalActions)?;
        }

        let node = tree.get(current);
        let rollout = if node.is_terminal {
            self.stats.terminal_hits += 1;
            Rollout { reward: node.state.reward().unwrap_or(0.0), steps: 0 }
        } else {
            let state = node.state.clone();
            self.stats.simulations += 1;
            self.rollout
                .simulate(state, &mut self.rng, self.config.max_rollout_depth)?
        };

        self.stats.observe(rollout.reward);
        tree.backpropagate(current, rollout.reward, rollout.steps);
        Ok(())
    }

    /// The root child with the highest best-seen reward, ties by mean.
    fn best_child(tree: &Tree<P>, id: NodeId) -> Option<NodeId> {
        tree.get(id)
            .children
            .iter()
            .map(|e| e.child)
            .max_by(|&a, &b| {
                let (a, b) = (&tree.get(a).stats, &tree.get(b).stats);
                a.max_reward
                    .total_cmp(&b.max_reward)
                    .then(a.mean_reward().total_cmp(&b.mean_reward()))
            })
    }

    /// Best action at the current root.
    ///
    /// Falls back to a random legal action if nothing was expanded.
    pub fn best_action(&mut self) -> Result<usize, SearchError> {
        let tree = self.tree.as_ref().ok_or(SearchError::NoTree)?;
        if let Some(child) = Self::best_child(tree, tree.root()) {
            return tree.get(child).action.ok_or(SearchError::NoTree);
        }
        self.rng
            .choose(&tree.root_node().untried)
            .copied()
            .ok_or(SearchError::NoLegalActions)
    }

    /// Commit `action`: the root moves to its child, keeping the subtree.
    pub fn advance(&mut self, action: usize) -> Result<(), SearchError> {
        let tree = self.tree.as_mut().ok_or(SearchError::NoTree)?;
        let root = tree.root();
        if !tree.get(root).actions().any(|a| a == action) {
            return Err(SearchError::InvalidAction(action));
        }
        let child = tree.expand(root, action)?;
        tree.set_root(child);
        Ok(())
    }

    /// The best line found so far, from the current root.
    #[must_use]
    pub fn best_line(&self) -> Vec<usize> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        let mut line = Vec::new();
        let mut current = tree.root();
        while let Some(child) = Self::best_child(tree, current) {
            if let Some(action) = tree.get(child).action {
                line.push(action);
            }
            current = child;
        }
        line
    }

    /// Best reward seen below the current root.
    #[must_use]
    pub fn best_reward(&self) -> Option<f64> {
        let tree = self.tree.as_ref()?;
        let best = tree.root_node().stats.max_reward;
        best.is_finite().then_some(best)
    }

    /// Run `runs` independent searches of `budget` each from `root` and keep
    /// the tree whose best reward is highest. Returns its best action.
    pub fn meta_search(&mut self, root: P, runs: usize, budget: Budget) -> Result<usize, SearchError> {
        let mut best: Option<(f64, Tree<P>)> = None;
        let mut total = SearchStats::default();
        for run in 0..runs.max(1) {
            let mut config = self.config.clone();
            config.budget = budget;
            let mut sub = Self {
                config,
                rollout: self.rollout.clone(),
                rng: self.rng.fork(),
                tree: None,
                stats: SearchStats::default(),
            };
            sub.search(root.clone())?;

            let reward = sub.best_reward().unwrap_or(f64::NEG_INFINITY);
            log::debug!("meta-search run {}: best reward {:.3}", run, reward);
            total.iterations += sub.stats.iterations;
            total.nodes_expanded += sub.stats.nodes_expanded;
            total.simulations += sub.stats.simulations;
            total.terminal_hits += sub.stats.terminal_hits;
            total.time_us += sub.stats.time_us;
            total.observe_depth(sub.stats.max_depth);
            total.observe(reward);

            if best.as_ref().map_or(true, |(b, _)| reward > *b) {
                best = sub.tree.take().map(|tree| (reward, tree));
            }
        }
        self.tree = best.map(|(_, tree)| tree);
        self.stats = total;
        self.best_action()
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> Option<&Tree<P>> {
        self.tree.as_ref()
    }

    /// State at the current root.
    #[must_use]
    pub fn root_state(&self) -> Option<&P> {
        self.tree.as_ref().map(|t| &t.root_node().state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::process::testing::BitString;

    fn config(iterations: u32) -> SearchConfig {
        SearchConfig::default().with_iterations(iterations).with_seed(7)
    }

    #[test]
    fn test_finds_best_line() {
        let mut search = SpMcts::new(config(300));
        assert_eq!(search.search(BitString::new(4)).unwrap(), 1);
        assert_eq!(search.best_line(), vec![1, 1, 1, 1]);
        assert_eq!(search.best_reward(), Some(2.0));
    }

    #[test]
    fn test_advance_keeps_subtree() {
        let mut search = SpMcts::new(config(200));
        search.search(BitString::new(4)).unwrap();
        let root_visits = search.tree().unwrap().root_node().stats.visits;

        search.advance(1).unwrap();
        let root = search.tree().unwrap().root_node();
        assert_eq!(root.state.bits, vec![1]);
        assert!(root.stats.visits > 0);
        assert!(root.stats.visits < root_visits);

        search.run().unwrap();
        assert_eq!(search.best_line(), vec![1, 1, 1]);
        assert_eq!(search.advance(5), Err(SearchError::InvalidAction(5)));
    }

    #[test]
    fn test_visit_threshold_delays_expansion() {
        let eager = {
            let mut s = SpMcts::new(config(40));
            s.search(BitString::new(8)).unwrap();
            s.tree().unwrap().len()
        };
        let lazy = {
            let mut s = SpMcts::new(config(40).with_visit_threshold(5));
            s.search(BitString::new(8)).unwrap();
            s.tree().unwrap().len()
        };
        assert!(lazy < eager);
    }

    #[test]
    fn test_meta_search_keeps_best_tree() {
        let mut search = SpMcts::new(config(0));
        let action = search
            .meta_search(BitString::new(3), 4, Budget::Iterations(30))
            .unwrap();

        assert_eq!(action, 1);
        assert_eq!(search.best_reward(), Some(2.0));
        assert_eq!(search.stats().iterations, 120);
    }

    #[test]
    fn test_requires_tree() {
        let mut search: SpMcts<BitString> = SpMcts::new(config(10));
        assert_eq!(search.run(), Err(SearchError::NoTree));
        assert_eq!(search.advance(0), Err(SearchError::NoTree));
        assert!(search.best_line().is_empty());
    }
}
