//! Tree search over decision processes.
//!
//! ## Overview
//!
//! Everything here is generic over [`DecisionProcess`](crate::rules::DecisionProcess):
//!
//! - **`Mcts`**: UCT search with random (or filtered) rollouts
//! - **`SpMcts`**: Single-player MCTS with a variance term, best-line
//!   tracking, re-rooting and meta-search
//! - **`TreeWalker`**: Depth-first enumeration with an explicit stack,
//!   optionally switching to playouts past a visit threshold
//!
//! ## Usage
//!
//! ```rust
//! use pandemic_sim::games::pandemic::{GameConfig, PandemicProcess};
//! use pandemic_sim::mcts::{Mcts, SearchConfig};
//! use pandemic_sim::rules::DecisionProcess;
//!
//! let process = PandemicProcess::from_config(GameConfig::default().with_seed(3)).unwrap();
//! let config = SearchConfig::default().with_iterations(50).with_max_rollout_depth(60);
//! let mut search = Mcts::new(config);
//! let action = search.search(process.clone()).unwrap();
//! assert!(process.legal_actions().contains(&action));
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod policy;
pub mod search;
pub mod sp_mcts;
pub mod stats;
pub mod tree;
pub mod walker;

pub use config::{Budget, BudgetClock, SearchConfig};
pub use error::SearchError;
pub use node::{Edge, Node, NodeId, NodeStats};
pub use policy::{
    select_child, FilteredRollout, RandomRollout, Rollout, RolloutPolicy, SelectionPolicy,
    SinglePlayerUct, Uct,
};
pub use search::Mcts;
pub use sp_mcts::SpMcts;
pub use stats::SearchStats;
pub use tree::{Tree, TreeStats};
pub use walker::{TreeWalker, WalkConfig, WalkStats};
