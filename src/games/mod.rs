//! Game implementations.
//!
//! Each game exposes its own state machine plus a
//! [`DecisionProcess`](crate::rules::DecisionProcess) adapter for search.

pub mod pandemic;
