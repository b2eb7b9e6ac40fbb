//! Game-agnostic building blocks: deterministic RNG and ordered card piles.
//!
//! Nothing here knows about cities, roles or diseases. Games build their
//! state out of these pieces.

pub mod rng;
pub mod deck;

pub use rng::GameRng;
pub use deck::{epidemic_segments, segment_bounds, Deck};
