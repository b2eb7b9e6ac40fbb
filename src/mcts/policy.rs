//! Search policies for selection and rollouts.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to score children during descent (UCT, SP-UCT)
//! - `RolloutPolicy`: How to play out a state to the end (random, filtered)

use crate::core::GameRng;
use crate::rules::DecisionProcess;

use super::error::SearchError;
use super::node::{NodeId, NodeStats};
use super::tree::Tree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Scores a child for descent; the highest score is followed.
pub trait SelectionPolicy {
    /// `sign` is the parent's perspective applied to the child's rewards.
    fn score(&self, child: &NodeStats, parent_visits: u32, sign: f64) -> f64;
}

/// UCT: `mean + c * sqrt(2 ln N / n)`.
#[derive(Clone, Copy, Debug)]
pub struct Uct {
    pub exploration: f64,
}

impl SelectionPolicy for Uct {
    fn score(&self, child: &NodeStats, parent_visits: u32, sign: f64) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        sign * child.mean_reward() + exploration_bonus(self.exploration, parent_visits, child.visits)
    }
}

/// Single-player UCT: UCT plus `sqrt((sum x^2 - n * mean^2 + D) / n)`.
///
/// The extra term keeps children with a wide reward spread attractive, since
/// in a single-agent search one great line matters more than the average.
#[derive(Clone, Copy, Debug)]
pub struct SinglePlayerUct {
    pub exploration: f64,
    pub smoothing: f64,
}

impl SelectionPolicy for SinglePlayerUct {
    fn score(&self, child: &NodeStats, parent_visits: u32, sign: f64) -> f64 {
        if child.visits == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(child.visits);
        let mean = child.mean_reward();
        let spread = (child.squared_reward - n * mean * mean).max(0.0);
        sign * mean
            + exploration_bonus(self.exploration, parent_visits, child.visits)
            + ((spread + self.smoothing) / n).sqrt()
    }
}

fn exploration_bonus(c: f64, parent_visits: u32, visits: u32) -> f64 {
    let ln_parent = f64::from(parent_visits.max(1)).ln();
    c * (2.0 * ln_parent / f64::from(visits)).sqrt()
}

/// Pick the best-scoring child of `parent`, breaking ties at random.
///
/// Returns `None` if the node has no expanded children.
pub fn select_child<P: DecisionProcess, S: SelectionPolicy>(
    tree: &Tree<P>,
    parent: NodeId,
    policy: &S,
    rng: &mut GameRng,
) -> Option<NodeId> {
    let node = tree.get(parent);
    let sign = node.state.perspective();
    let parent_visits = node.stats.visits;

    let mut best = f64::NEG_INFINITY;
    let mut ties: Vec<NodeId> = Vec::new();
    for edge in &node.children {
        let score = policy.score(&tree.get(edge.child).stats, parent_visits, sign);
        if score > best {
            best = score;
            ties.clear();
            ties.push(edge.child);
        } else if score == best {
            ties.push(edge.child);
        }
    }
    rng.choose(&ties).copied()
}

// =============================================================================
// Rollout Policy
// =============================================================================

/// Result of one playout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rollout {
    pub reward: f64,
    /// Actions played.
    pub steps: u32,
}

/// Policy for playing out a state.
pub trait RolloutPolicy<P: DecisionProcess> {
    /// Pick one of `actions` (never empty).
    fn choose(&self, state: &P, actions: &[usize], rng: &mut GameRng) -> usize;

    /// Play from `state` until terminal or `max_depth` steps (0 = no cap).
    ///
    /// A cut-off playout is scored with the state's heuristic.
    fn simulate(&self, state: P, rng: &mut GameRng, max_depth: u32) -> Result<Rollout, SearchError> {
        let mut state = state;
        let mut steps = 0;
        loop {
            if state.is_terminal() {
                let reward = state.reward().unwrap_or(0.0);
                return Ok(Rollout { reward, steps });
            }
            if max_depth > 0 && steps >= max_depth {
                return Ok(Rollout { reward: state.heuristic(), steps });
            }

            let actions = state.legal_actions();
            if actions.is_empty() {
                return Err(SearchError::NoLegalActions);
            }
            let action = self.choose(&state, &actions, rng);
            state = state.apply(action).ok_or(SearchError::InvalidAction(action))?;
            steps += 1;
        }
    }
}

/// Uniform random rollouts.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomRollout;

impl<P: DecisionProcess> RolloutPolicy<P> for RandomRollout {
    fn choose(&self, _state: &P, actions: &[usize], rng: &mut GameRng) -> usize {
        actions[rng.gen_range_usize(0..actions.len())]
    }
}

/// Random rollouts restricted to the actions a filter accepts.
///
/// Falls back to every legal action when the filter rejects them all.
#[derive(Clone, Copy, Debug)]
pub struct FilteredRollout<F> {
    filter: F,
}

impl<F> FilteredRollout<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }
}

impl<P, F> RolloutPolicy<P> for FilteredRollout<F>
where
    P: DecisionProcess,
    F: Fn(&P, usize) -> bool,
{
    fn choose(&self, state: &P, actions: &[usize], rng: &mut GameRng) -> usize {
        let preferred: Vec<usize> = actions
            .iter()
            .copied()
            .filter(|&a| (self.filter)(state, a))
            .collect();
        let pool = if preferred.is_empty() { actions } else { &preferred[..] };
        pool[rng.gen_range_usize(0..pool.len())]
    }
}
