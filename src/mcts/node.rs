//! Search tree nodes.
//!
//! Nodes live in an arena (see `tree`) and refer to each other by `NodeId`.
//! Each node owns the process state it stands for; persistent state types
//! make that cheap.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::rules::DecisionProcess;

/// Index into the tree's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// An expanded action and the child it leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub action: usize,
    pub child: NodeId,
}

/// Reward statistics of one node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub visits: u32,
    pub total_reward: f64,
    /// Sum of squared rewards, for the single-player variance term.
    pub squared_reward: f64,
    /// Best reward seen through this node.
    pub max_reward: f64,
    /// Steps from this node to the end of the best line.
    pub max_reward_steps: u32,
}

impl Default for NodeStats {
    fn default() -> Self {
        Self {
            visits: 0,
            total_reward: 0.0,
            squared_reward: 0.0,
            max_reward: f64::NEG_INFINITY,
            max_reward_steps: 0,
        }
    }
}

impl NodeStats {
    #[must_use]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / f64::from(self.visits)
        }
    }

    /// Record one simulation result that ended `steps` steps below this node.
    pub fn record(&mut self, reward: f64, steps: u32) {
        self.visits += 1;
        self.total_reward += reward;
        self.squared_reward += reward * reward;
        if reward > self.max_reward {
            self.max_reward = reward;
            self.max_reward_steps = steps;
        }
    }
}

/// A node in the search tree.
#[derive(Clone, Debug)]
pub struct Node<P> {
    /// Parent node (NONE for the original root).
    pub parent: NodeId,

    /// Action taken from the parent to reach this node.
    pub action: Option<usize>,

    /// Depth in tree (original root = 0).
    pub depth: u16,

    pub state: P,

    /// Legal actions with no child yet.
    pub untried: Vec<usize>,

    /// Expanded children, in expansion order.
    pub children: SmallVec<[Edge; 8]>,

    pub stats: NodeStats,

    pub is_terminal: bool,
}

impl<P: DecisionProcess> Node<P> {
    pub fn new(parent: NodeId, action: Option<usize>, depth: u16, state: P) -> Self {
        let is_terminal = state.is_terminal();
        let untried = if is_terminal { Vec::new() } else { state.legal_actions() };
        Self {
            parent,
            action,
            depth,
            state,
            untried,
            children: SmallVec::new(),
            stats: NodeStats::default(),
            is_terminal,
        }
    }

    pub fn root(state: P) -> Self {
        Self::new(NodeId::NONE, None, 0, state)
    }

    /// A live node with nothing to try breaks the process contract.
    #[must_use]
    pub fn is_dead_end(&self) -> bool {
        !self.is_terminal && self.untried.is_empty() && self.children.is_empty()
    }

    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// The child reached by `action`, if expanded.
    #[must_use]
    pub fn child(&self, action: usize) -> Option<NodeId> {
        self.children.iter().find(|e| e.action == action).map(|e| e.child)
    }

    /// Every legal action of this node, expanded or not.
    pub fn actions(&self) -> impl Iterator<Item = usize> + '_ {
        self.children.iter().map(|e| e.action).chain(self.untried.iter().copied())
    }
}
