//! Error types for setup, stepping and command parsing.
//!
//! Losing the game is not an error: running out of cubes or player cards and
//! hitting the outbreak limit all end in `GameStatus::Lost`.

use thiserror::Error;

use super::action::Action;
use super::role::Role;
use super::state::Phase;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player count must be 2-4, got {0}")]
    PlayerCount(usize),
    #[error("expected {expected} roles, got {got}")]
    RoleCount { expected: usize, got: usize },
    #[error("role {0} assigned twice")]
    DuplicateRole(Role),
    #[error("infection rate table is empty")]
    NoInfectionRates,
    #[error("at least one research station is required")]
    NoResearchStations,
    #[error("forecast must look at one or more cards")]
    ForecastDepth,
    #[error("too many epidemic cards: {0}")]
    EpidemicCount(usize),
    #[error("start city is not on the map")]
    StartCity,
    #[error("player deck too small to deal starting hands")]
    DeckTooSmall,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal action {action:?} in phase {phase:?}")]
    IllegalAction { action: Action, phase: Phase },
    #[error("a player decision is pending in phase {0:?}")]
    DecisionPending(Phase),
    #[error("the game is over")]
    GameOver,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("wrong number of operands for `{0}`")]
    Arity(String),
    #[error("unknown city `{0}`")]
    City(String),
    #[error("unknown role `{0}`")]
    Role(String),
    #[error("unknown color `{0}`")]
    Color(String),
    #[error("unknown card `{0}`")]
    Card(String),
}
