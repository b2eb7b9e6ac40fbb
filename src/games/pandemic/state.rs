//! The game state aggregate.
//!
//! `GameState` owns everything that changes during a game. The map and the
//! configuration are shared behind `Arc`s, and the collections are
//! persistent (`im`), so cloning a state to branch a search tree costs a few
//! reference-count bumps rather than a deep copy.
//!
//! All mutation goes through the rules (`infection`, `engine`); this module
//! only holds data and read-only accessors.

use std::sync::Arc;

use im::{OrdSet, Vector};
use smallvec::SmallVec;

use crate::core::{Deck, GameRng};

use super::card::Card;
use super::config::GameConfig;
use super::map::{CityGraph, CityId, Color};
use super::player::PlayerState;
use super::role::Role;

// =============================================================================
// Phases and status
// =============================================================================

/// Phase of the turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Setup,
    Actions,
    DrawCards,
    Epidemic,
    Infections,
    /// Generic pick-K-cards step; see [`CardSelection`].
    ChooseCards,
    /// Picking the cards that pay for a cure.
    CureVirus,
    /// Choosing a full reordering of the top infection cards.
    Forecast,
    /// Choosing a station to remove so a new one can be placed.
    MoveStation,
}

impl Phase {
    /// Sub-phases that only offer their own resolution actions.
    #[must_use]
    pub const fn is_sub_phase(self) -> bool {
        matches!(
            self,
            Phase::ChooseCards | Phase::CureVirus | Phase::Forecast | Phase::MoveStation
        )
    }

    /// Phases the engine advances on `step(None)`.
    #[must_use]
    pub const fn is_automatic(self) -> bool {
        matches!(self, Phase::DrawCards | Phase::Epidemic | Phase::Infections)
    }
}

/// Why a game was lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LossCause {
    OutbreakLimit,
    CubesExhausted(Color),
    PlayerDeckEmpty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Running,
    Won,
    Lost(LossCause),
}

impl GameStatus {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

// =============================================================================
// Sub-phase payloads
// =============================================================================

/// What happens once a card selection is complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Continuation {
    /// Discard the chosen cards and cure the color.
    DiscoverCure(Color),
    /// Put the chosen infection cards back on top, first chosen on top.
    Forecast,
}

/// A pending "choose K of these cards" decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardSelection {
    pub role: Role,
    pub offered: OrdSet<Card>,
    pub chosen: Vector<Card>,
    pub count: usize,
    pub then: Continuation,
}

impl CardSelection {
    /// Offered cards not yet chosen.
    pub fn remaining(&self) -> impl Iterator<Item = Card> + '_ {
        self.offered.iter().copied().filter(|c| !self.chosen.contains(c))
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.chosen.len() >= self.count
    }
}

/// Per-city mutable record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CityState {
    pub markers: [u8; 4],
    pub station: bool,
}

// =============================================================================
// Game state
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) graph: Arc<CityGraph>,
    pub(crate) config: Arc<GameConfig>,

    pub(crate) status: GameStatus,
    pub(crate) phase: Phase,
    /// Phase to return to when a sub-phase or epidemic completes.
    pub(crate) resume_phase: Phase,
    pub(crate) selection: Option<CardSelection>,
    /// Who owes the pending `MoveStation` decision.
    pub(crate) pending_role: Option<Role>,

    pub(crate) players: SmallVec<[PlayerState; 4]>,
    pub(crate) active: usize,
    pub(crate) actions_left: u8,
    pub(crate) turn: u32,

    pub(crate) cities: Vector<CityState>,
    pub(crate) cubes: [u8; 4],
    pub(crate) cures: [bool; 4],
    pub(crate) outbreaks: u8,
    pub(crate) infection_rate_index: usize,
    pub(crate) quiet_night: bool,
    pub(crate) stations_left: u8,
    pub(crate) last_built_station: Option<CityId>,

    /// Player cards drawn this turn.
    pub(crate) drawn: u8,
    /// Infection cards resolved this turn.
    pub(crate) infections_done: u8,

    pub(crate) player_deck: Deck<Card>,
    pub(crate) player_discard: Deck<Card>,
    pub(crate) infection_deck: Deck<CityId>,
    pub(crate) infection_discard: Deck<CityId>,

    pub(crate) rng: GameRng,
}

impl GameState {
    #[must_use]
    pub fn graph(&self) -> &CityGraph {
        &self.graph
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The pending card selection, in `ChooseCards` and `CureVirus`.
    #[must_use]
    pub fn selection(&self) -> Option<&CardSelection> {
        self.selection.as_ref()
    }

    // === Players ===

    #[must_use]
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, role: Role) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.role() == role)
    }

    pub(crate) fn player_mut(&mut self, role: Role) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.role() == role)
    }

    #[must_use]
    pub fn active_player(&self) -> &PlayerState {
        &self.players[self.active]
    }

    #[must_use]
    pub fn active_role(&self) -> Role {
        self.players[self.active].role()
    }

    #[must_use]
    pub fn actions_left(&self) -> u8 {
        self.actions_left
    }

    /// Turns completed so far.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    // === Board ===

    #[must_use]
    pub fn city(&self, city: CityId) -> &CityState {
        &self.cities[city.index()]
    }

    #[must_use]
    pub fn markers(&self, city: CityId, color: Color) -> u8 {
        self.cities[city.index()].markers[color.index()]
    }

    #[must_use]
    pub fn has_station(&self, city: CityId) -> bool {
        self.cities[city.index()].station
    }

    /// Cities holding a research station, in id order.
    pub fn stations(&self) -> impl Iterator<Item = CityId> + '_ {
        self.graph.ids().filter(|&c| self.has_station(c))
    }

    /// Stations still in the supply.
    #[must_use]
    pub fn stations_left(&self) -> u8 {
        self.stations_left
    }

    #[must_use]
    pub fn last_built_station(&self) -> Option<CityId> {
        self.last_built_station
    }

    #[must_use]
    pub fn cubes_left(&self, color: Color) -> u8 {
        self.cubes[color.index()]
    }

    /// Markers of `color` on the whole board.
    #[must_use]
    pub fn markers_on_board(&self, color: Color) -> u32 {
        self.cities.iter().map(|c| u32::from(c.markers[color.index()])).sum()
    }

    #[must_use]
    pub fn is_cured(&self, color: Color) -> bool {
        self.cures[color.index()]
    }

    #[must_use]
    pub fn cure_count(&self) -> usize {
        self.cures.iter().filter(|&&c| c).count()
    }

    #[must_use]
    pub fn outbreaks(&self) -> u8 {
        self.outbreaks
    }

    #[must_use]
    pub fn infection_rate_index(&self) -> usize {
        self.infection_rate_index
    }

    /// Infection cards drawn per turn at the current rate marker.
    #[must_use]
    pub fn infection_rate(&self) -> u8 {
        let rates = &self.config.infection_rates;
        rates[self.infection_rate_index.min(rates.len() - 1)]
    }

    #[must_use]
    pub fn quiet_night(&self) -> bool {
        self.quiet_night
    }

    // === Decks ===

    #[must_use]
    pub fn player_deck(&self) -> &Deck<Card> {
        &self.player_deck
    }

    #[must_use]
    pub fn player_discard(&self) -> &Deck<Card> {
        &self.player_discard
    }

    #[must_use]
    pub fn infection_deck(&self) -> &Deck<CityId> {
        &self.infection_deck
    }

    #[must_use]
    pub fn infection_discard(&self) -> &Deck<CityId> {
        &self.infection_discard
    }

    /// Color with the fewest cubes left, first in color order on ties.
    #[must_use]
    pub fn scarcest_color(&self) -> (Color, u8) {
        let [first, rest @ ..] = Color::ALL;
        rest.into_iter().fold((first, self.cubes_left(first)), |best, color| {
            let left = self.cubes_left(color);
            if left < best.1 {
                (color, left)
            } else {
                best
            }
        })
    }

    /// Whether any player is over the hand limit.
    #[must_use]
    pub fn hand_limit_exceeded(&self) -> bool {
        let limit = self.config.hand_limit;
        self.players.iter().any(|p| p.card_count() > limit)
    }

    // === Status ===

    /// End the game as lost. The first cause sticks.
    pub(crate) fn lose(&mut self, cause: LossCause) {
        if self.status == GameStatus::Running {
            log::debug!("game lost on turn {}: {:?}", self.turn, cause);
            self.status = GameStatus::Lost(cause);
        }
    }

    pub(crate) fn win(&mut self) {
        if self.status == GameStatus::Running {
            log::debug!("game won on turn {}", self.turn);
            self.status = GameStatus::Won;
        }
    }
}
