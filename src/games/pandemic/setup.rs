//! Building the initial game state.

use std::sync::Arc;

use im::Vector;
use smallvec::SmallVec;

use crate::core::{Deck, GameRng};

use super::card::{Card, EventKind};
use super::config::GameConfig;
use super::error::ConfigError;
use super::map::CityGraph;
use super::player::PlayerState;
use super::role::Role;
use super::state::{CityState, GameState, GameStatus, Phase};

impl GameState {
    /// Set up a game on the standard map.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_graph(config, Arc::new(CityGraph::standard()))
    }

    /// Set up a game on any map.
    ///
    /// Every random choice comes from `config.seed`: the role draft, both
    /// deck shuffles and the epidemic placement each use their own stream.
    pub fn with_graph(config: GameConfig, graph: Arc<CityGraph>) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.start_city.index() >= graph.len() {
            return Err(ConfigError::StartCity);
        }

        let root = GameRng::new(config.seed);
        let mut role_rng = root.for_context("roles");
        let mut player_rng = root.for_context("player-deck");
        let mut infection_rng = root.for_context("infection-deck");

        let roles = match &config.roles {
            Some(roles) => roles.clone(),
            None => role_rng.sample(&Role::ALL, config.player_count),
        };
        let mut players: SmallVec<[PlayerState; 4]> = roles
            .iter()
            .map(|&role| PlayerState::new(role, config.start_city))
            .collect();

        // Deal from the shuffled city and event cards, then seed epidemics
        // into what is left.
        let mut cards: Vec<Card> = graph
            .ids()
            .map(Card::City)
            .chain(EventKind::ALL.into_iter().map(Card::Event))
            .collect();
        player_rng.shuffle(&mut cards);

        let hand = config.starting_hand();
        if cards.len() < hand * players.len() {
            return Err(ConfigError::DeckTooSmall);
        }
        for player in players.iter_mut() {
            for card in cards.drain(..hand) {
                player.add_card(card);
            }
        }
        let epidemics = (0..config.epidemic_cards).map(|i| Card::Epidemic(i as u8)).collect();
        let player_deck = Deck::with_epidemics(cards, epidemics, &mut player_rng);

        let mut infection_deck: Deck<_> = graph.ids().collect();
        infection_deck.shuffle(&mut infection_rng);

        let mut cities: Vector<CityState> = std::iter::repeat(CityState::default())
            .take(graph.len())
            .collect();
        cities[config.start_city.index()].station = true;

        let cubes = [config.cubes_per_color; 4];
        let stations_left = config.research_stations - 1;
        let actions_left = config.actions_per_turn;
        let initial_infection = config.initial_infection.clone();

        let mut state = GameState {
            graph,
            config: Arc::new(config),
            status: GameStatus::Running,
            phase: Phase::Setup,
            resume_phase: Phase::Actions,
            selection: None,
            pending_role: None,
            players,
            active: 0,
            actions_left,
            turn: 0,
            cities,
            cubes,
            cures: [false; 4],
            outbreaks: 0,
            infection_rate_index: 0,
            quiet_night: false,
            stations_left,
            last_built_station: None,
            drawn: 0,
            infections_done: 0,
            player_deck,
            player_discard: Deck::new(),
            infection_deck,
            infection_discard: Deck::new(),
            rng: root.for_context("play"),
        };

        for markers in initial_infection {
            let Some(city) = state.infection_deck.draw() else {
                break;
            };
            let color = state.graph.color(city);
            state.infect_and_spread(city, color, markers);
            state.infection_discard.discard(city);
        }

        state.phase = Phase::Actions;
        log::debug!(
            "new game: seed {}, roles {:?}, {} player cards, {} epidemics",
            state.config.seed,
            roles,
            state.player_deck.len(),
            state.config.epidemic_cards
        );
        Ok(state)
    }
}
