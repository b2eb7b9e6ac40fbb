//! Cooperative pandemic board game.
//!
//! Two to four players share one board of 48 cities in four colors and race
//! to cure every disease before outbreaks, cube shortages or an empty player
//! deck end the game.
//!
//! - `map`: The city graph and disease colors
//! - `state`: Immutable-style game state and its read accessors
//! - `generator`: Legal actions for the current phase
//! - `engine`: The phase machine (`GameState::apply`, `Engine`)
//! - `infection`: Marker placement and outbreak chains
//! - `command`: Short text encoding of actions
//! - `process`: The search adapter
//!
//! ## Usage
//!
//! ```rust
//! use pandemic_sim::games::pandemic::{Engine, GameConfig};
//!
//! let mut engine = Engine::new(GameConfig::default().with_seed(7)).unwrap();
//! let action = engine.legal_actions(None)[0].clone();
//! let state = engine.step(Some(&action)).unwrap();
//! assert_eq!(state.turn(), 0);
//! ```

pub mod action;
pub mod card;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
mod generator;
mod infection;
pub mod map;
pub mod player;
pub mod process;
pub mod role;
mod setup;
pub mod state;

pub use action::{Action, Event, Movement, Other};
pub use card::{Card, EventKind};
pub use command::{card_token, parse_card};
pub use config::{ForecastMode, GameConfig};
pub use engine::Engine;
pub use error::{CommandError, ConfigError, EngineError};
pub use infection::{Infection, MAX_MARKERS};
pub use map::{cities, City, CityGraph, CityId, Color, MapError};
pub use player::{CardSource, PlayerState};
pub use process::{Choice, PandemicProcess};
pub use role::{Capabilities, Role};
pub use state::{CardSelection, CityState, Continuation, GameState, GameStatus, LossCause, Phase};
