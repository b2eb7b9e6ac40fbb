//! Arena-based search tree.
//!
//! Nodes are stored in a flat `Vec<Node<P>>` and referenced by `NodeId`
//! indices. The root can move down the tree (`set_root`) so a committed
//! action keeps the statistics gathered below it.

use super::error::SearchError;
use super::node::{Edge, Node, NodeId};
use crate::rules::DecisionProcess;

#[derive(Clone, Debug)]
pub struct Tree<P> {
    nodes: Vec<Node<P>>,
    root: NodeId,
}

impl<P: DecisionProcess> Tree<P> {
    /// Create a tree holding only `state`.
    pub fn new(state: P) -> Result<Self, SearchError> {
        let root = Node::root(state);
        if root.is_dead_end() {
            return Err(SearchError::NoLegalActions);
        }
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(root);
        Ok(Self { nodes, root: NodeId::new(0) })
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &Node<P> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<P> {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn root_node(&self) -> &Node<P> {
        self.get(self.root)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move the root to a descendant. Backpropagation stops at the new root.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Create the child reached by `action` from `parent`.
    ///
    /// Fails if the action is not legal there or the child is a live state
    /// without legal actions.
    pub fn expand(&mut self, parent: NodeId, action: usize) -> Result<NodeId, SearchError> {
        if let Some(child) = self.get(parent).child(action) {
            return Ok(child);
        }
        let node = self.get(parent);
        let state = node
            .state
            .apply(action)
            .ok_or(SearchError::InvalidAction(action))?;
        let child = Node::new(parent, Some(action), node.depth + 1, state);
        if child.is_dead_end() {
            return Err(SearchError::NoLegalActions);
        }

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(child);
        let parent = self.get_mut(parent);
        parent.untried.retain(|&a| a != action);
        parent.children.push(Edge { action, child: id });
        Ok(id)
    }

    /// Record `reward` on `from` and every ancestor up to the root.
    ///
    /// `steps` is the length of the simulated line below `from`; ancestors
    /// see it one step longer per level.
    pub fn backpropagate(&mut self, from: NodeId, reward: f64, steps: u32) {
        let root = self.root;
        let mut current = from;
        let mut steps = steps;
        loop {
            let node = self.get_mut(current);
            node.stats.record(reward, steps);
            if current == root || node.parent.is_none() {
                break;
            }
            current = node.parent;
            steps += 1;
        }
    }

    /// Actions from the root down to `id`.
    #[must_use]
    pub fn line_to(&self, id: NodeId) -> Vec<usize> {
        let mut line = Vec::new();
        let mut current = id;
        while current != self.root && !current.is_none() {
            let node = self.get(current);
            if let Some(action) = node.action {
                line.push(action);
            }
            current = node.parent;
        }
        line.reverse();
        line
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<P>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let base = self.root_node().depth;
        TreeStats {
            node_count: self.nodes.len(),
            max_depth: self.nodes.iter().map(|n| n.depth.saturating_sub(base)).max().unwrap_or(0),
            terminal_count: self.nodes.iter().filter(|n| n.is_terminal).count(),
            expanded_edges: self.nodes.iter().map(|n| n.children.len()).sum(),
            untried_edges: self.nodes.iter().map(|n| n.untried.len()).sum(),
        }
    }
}

/// Shape of a search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub node_count: usize,
    /// Deepest node, relative to the current root.
    pub max_depth: u16,
    pub terminal_count: usize,
    pub expanded_edges: usize,
    pub untried_edges: usize,
}

impl TreeStats {
    /// Average legal actions per node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.node_count == 0 {
            0.0
        } else {
            (self.expanded_edges + self.untried_edges) as f64 / self.node_count as f64
        }
    }

    #[must_use]
    pub fn expansion_ratio(&self) -> f64 {
        let total = self.expanded_edges + self.untried_edges;
        if total == 0 {
            0.0
        } else {
            self.expanded_edges as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::process::testing::{BitString, Stuck};

    #[test]
    fn test_tree_new() {
        let tree = Tree::new(BitString::new(2)).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(matches!(Tree::new(Stuck), Err(SearchError::NoLegalActions)));
    }

    #[test]
    fn test_expand_moves_action_out_of_untried() {
        let mut tree = Tree::new(BitString::new(2)).unwrap();
        let root = tree.root();

        let child = tree.expand(root, 1).unwrap();
        assert_eq!(tree.get(root).untried, vec![0]);
        assert_eq!(tree.get(root).child(1), Some(child));
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).state.bits, vec![1]);

        // Expanding twice returns the same child.
        assert_eq!(tree.expand(root, 1).unwrap(), child);
        assert_eq!(tree.expand(root, 7), Err(SearchError::InvalidAction(7)));
    }

    #[test]
    fn test_backpropagate_stops_at_root() {
        let mut tree = Tree::new(BitString::new(3)).unwrap();
        let a = tree.expand(tree.root(), 0).unwrap();
        let b = tree.expand(a, 1).unwrap();

        tree.set_root(a);
        tree.backpropagate(b, 0.5, 1);

        assert_eq!(tree.get(b).stats.visits, 1);
        assert_eq!(tree.get(a).stats.visits, 1);
        assert_eq!(tree.get(a).stats.max_reward_steps, 2);
        assert_eq!(tree.get(NodeId::new(0)).stats.visits, 0);
        assert_eq!(tree.line_to(b), vec![1]);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = Tree::new(BitString::new(1)).unwrap();
        let root = tree.root();
        tree.expand(root, 0).unwrap();

        let stats = tree.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.expanded_edges, 1);
        assert_eq!(stats.untried_edges, 1);
        assert_eq!(stats.expansion_ratio(), 0.5);
    }
}
