//! Search errors.
//!
//! These are contract violations by the searched process or misuse of the
//! searcher, never ordinary outcomes of the searched game.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("non-terminal state has no legal actions")]
    NoLegalActions,
    #[error("action {0} is not legal in this state")]
    InvalidAction(usize),
    #[error("cannot search from a terminal state")]
    TerminalRoot,
    #[error("no search tree; run a search first")]
    NoTree,
}
