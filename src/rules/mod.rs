//! The search seam.
//!
//! Games implement `DecisionProcess` to expose:
//! - Legal action indices for a state
//! - Successor states
//! - Terminal rewards
//!
//! The search algorithms call into `DecisionProcess` but never interpret
//! game-specific concepts directly.

pub mod process;

pub use process::DecisionProcess;
