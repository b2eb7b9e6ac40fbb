//! # pandemic-sim
//!
//! A deterministic rules engine for a cooperative pandemic board game, and
//! the tree searches that play it.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Every shuffle comes from a seeded ChaCha stream
//!    owned by the state. Same seed and same actions, same game.
//!
//! 2. **Cheap Clones**: Game state is built on `im-rs` persistent
//!    collections so search can branch on copies.
//!
//! 3. **Search Is Game-Agnostic**: The searchers only see the
//!    `DecisionProcess` trait; the game plugs in through an adapter.
//!
//! ## Modules
//!
//! - `core`: Seeded RNG and ordered card piles
//! - `rules`: The `DecisionProcess` trait
//! - `mcts`: UCT, single-player MCTS and the exhaustive tree walker
//! - `games`: Game implementations (the pandemic engine)

pub mod core;
pub mod rules;
pub mod mcts;
pub mod games;

// Re-export commonly used types
pub use crate::core::{Deck, GameRng};

pub use crate::rules::DecisionProcess;

pub use crate::mcts::{
    Budget, Mcts, SearchConfig, SearchError, SearchStats, SpMcts, TreeWalker, WalkConfig,
    WalkStats,
};

pub use crate::games::pandemic::{
    Action, Engine, EngineError, GameConfig, GameState, GameStatus, PandemicProcess, Phase, Role,
};
