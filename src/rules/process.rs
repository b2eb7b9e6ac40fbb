//! Decision process trait for search.
//!
//! A `DecisionProcess` is a state that knows its own legal moves:
//! - Which actions are legal, as indices
//! - How applying one produces the next state
//! - What a terminal state is worth
//!
//! Search algorithms only ever talk to this trait, so any game (or toy
//! problem) that implements it can be searched.

/// A searchable state.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Must be deterministic; the same state always yields
///   the same indices in the same order
/// - `apply`: Must not affect `self`; return the successor or `None` for an
///   index that is not legal
/// - `reward`: `Some` exactly when the state is terminal
/// - A non-terminal state with no legal actions breaks the contract; search
///   reports it as an error
pub trait DecisionProcess: Clone {
    /// Whether the process has ended.
    fn is_terminal(&self) -> bool;

    /// Legal action indices.
    fn legal_actions(&self) -> Vec<usize>;

    /// The successor state after taking `action`.
    fn apply(&self, action: usize) -> Option<Self>;

    /// Reward of a terminal state, from the acting side's perspective.
    fn reward(&self) -> Option<f64>;

    /// Sign applied to child rewards when the parent selects among them.
    ///
    /// Cooperative and single-agent processes keep the default.
    fn perspective(&self) -> f64 {
        1.0
    }

    /// Estimate for a non-terminal state, used when a rollout is cut off.
    fn heuristic(&self) -> f64 {
        0.0
    }
}


#[cfg(test)]
mod tests {
    use super::testing::BitString;
    use super::*;

    #[test]
    fn test_apply_leaves_parent_untouched() {
        let root = BitString::new(2);
        let child = root.apply(1).unwrap();

        assert!(root.bits.is_empty());
        assert_eq!(child.bits, vec![1]);
        assert!(root.apply(2).is_none());
    }

    #[test]
    fn test_reward_only_at_terminal() {
        let root = BitString::new(2);
        assert_eq!(root.reward(), None);

        let best = root.apply(1).unwrap().apply(1).unwrap();
        assert!(best.is_terminal());
        assert_eq!(best.reward(), Some(2.0));
        assert_eq!(best.perspective(), 1.0);
    }
}
