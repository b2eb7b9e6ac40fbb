//! Game configuration.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::map::{cities, CityId};
use super::role::Role;

/// How a played Forecast lets its holder reorder the infection deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForecastMode {
    /// Pick the new order one card at a time through the choose-cards phase.
    #[default]
    Sequential,
    /// Offer one `ForecastOrder` action per permutation of the top cards.
    Permutations,
}

/// Rules and setup parameters for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of players (2-4).
    pub player_count: usize,

    /// Fixed roles in seat order. Drawn at random when `None`.
    pub roles: Option<Vec<Role>>,

    /// Epidemic cards seeded into the player deck.
    pub epidemic_cards: usize,

    /// Infection rate per rate-marker position.
    pub infection_rates: Vec<u8>,

    /// Cubes available per color.
    pub cubes_per_color: u8,

    /// Outbreak count at which the game is lost.
    pub outbreak_limit: u8,

    /// Actions per turn.
    pub actions_per_turn: u8,

    /// Cards a player may hold before being forced to discard.
    pub hand_limit: usize,

    /// Player cards drawn at the end of each turn.
    pub cards_per_turn: u8,

    /// Research stations in the game, including the starting one.
    pub research_stations: u8,

    /// Where the pawns and the first station start.
    pub start_city: CityId,

    /// Markers placed on each city drawn during setup, in draw order.
    pub initial_infection: Vec<u8>,

    /// How many infection cards a Forecast rearranges.
    pub forecast_depth: usize,

    pub forecast_mode: ForecastMode,

    /// Seed for every shuffle and draft in the game.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            roles: None,
            epidemic_cards: 4,
            infection_rates: vec![2, 2, 2, 3, 3, 4, 4],
            cubes_per_color: 24,
            outbreak_limit: 8,
            actions_per_turn: 4,
            hand_limit: 7,
            cards_per_turn: 2,
            research_stations: 6,
            start_city: cities::ATLANTA,
            initial_infection: vec![3, 3, 3, 2, 2, 2, 1, 1, 1],
            forecast_depth: 6,
            forecast_mode: ForecastMode::Sequential,
            seed: 42,
        }
    }
}

impl GameConfig {
    pub fn with_players(mut self, count: usize) -> Self {
        self.player_count = count;
        self
    }

    /// Fix the roles; also sets the player count.
    pub fn with_roles(mut self, roles: impl Into<Vec<Role>>) -> Self {
        let roles = roles.into();
        self.player_count = roles.len();
        self.roles = Some(roles);
        self
    }

    pub fn with_epidemics(mut self, count: usize) -> Self {
        self.epidemic_cards = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_forecast_mode(mut self, mode: ForecastMode) -> Self {
        self.forecast_mode = mode;
        self
    }

    /// Cards each player is dealt at setup.
    #[must_use]
    pub fn starting_hand(&self) -> usize {
        6usize.saturating_sub(self.player_count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=4).contains(&self.player_count) {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if let Some(roles) = &self.roles {
            if roles.len() != self.player_count {
                return Err(ConfigError::RoleCount {
                    expected: self.player_count,
                    got: roles.len(),
                });
            }
            for (i, role) in roles.iter().enumerate() {
                if roles[..i].contains(role) {
                    return Err(ConfigError::DuplicateRole(*role));
                }
            }
        }
        if self.infection_rates.is_empty() {
            return Err(ConfigError::NoInfectionRates);
        }
        if self.research_stations == 0 {
            return Err(ConfigError::NoResearchStations);
        }
        if self.forecast_depth == 0 {
            return Err(ConfigError::ForecastDepth);
        }
        if self.epidemic_cards > usize::from(u8::MAX) {
            return Err(ConfigError::EpidemicCount(self.epidemic_cards));
        }
        Ok(())
    }
}
