//! The turn state machine.
//!
//! `GameState::apply` is the only mutation entry point after setup. A
//! player action is checked against the legal action list and performed;
//! `None` advances an automatic phase (one card draw, one epidemic
//! intensification or one infection per call). After each step the state
//! settles: an action phase with no budget left moves on to drawing.
//!
//! [`Engine`] wraps a state with reset and reporting for hosts.

use std::sync::Arc;

use im::{OrdSet, Vector};

use super::action::{Action, Event, Movement, Other};
use super::card::Card;
use super::config::{ForecastMode, GameConfig};
use super::error::{ConfigError, EngineError};
use super::infection::MAX_MARKERS;
use super::map::{CityGraph, CityId};
use super::player::CardSource;
use super::role::Role;
use super::state::{CardSelection, Continuation, GameState, LossCause, Phase};

impl GameState {
    /// Advance the game by one step.
    ///
    /// `Some(action)` must be one of [`legal_actions`](Self::legal_actions).
    /// `None` is only accepted in an automatic phase with nobody over the
    /// hand limit.
    pub fn apply(&mut self, action: Option<&Action>) -> Result<(), EngineError> {
        if self.status.is_over() {
            return Err(EngineError::GameOver);
        }
        match action {
            None => {
                if !self.phase.is_automatic() || self.hand_limit_exceeded() {
                    return Err(EngineError::DecisionPending(self.phase));
                }
                self.advance();
            }
            Some(action) => {
                if !self.legal_actions(None).contains(action) {
                    return Err(EngineError::IllegalAction {
                        action: action.clone(),
                        phase: self.phase,
                    });
                }
                self.perform(action);
            }
        }
        self.settle();
        Ok(())
    }

    /// Step with an action already known to be legal, or `None` in an
    /// automatic phase. Used by search, which only ever picks from the
    /// generated list.
    pub(crate) fn apply_legal(&mut self, action: Option<&Action>) {
        match action {
            Some(action) => self.perform(action),
            None => self.advance(),
        }
        self.settle();
    }

    /// Whether `None` is the only way forward.
    #[must_use]
    pub fn awaits_advance(&self) -> bool {
        !self.status.is_over() && self.phase.is_automatic() && !self.hand_limit_exceeded()
    }

    fn settle(&mut self) {
        if self.status.is_over() {
            return;
        }
        if self.phase == Phase::Actions && self.actions_left == 0 {
            log::trace!("{} is out of actions", self.active_role());
            self.phase = Phase::DrawCards;
        }
    }

    // =========================================================================
    // Player actions
    // =========================================================================

    fn perform(&mut self, action: &Action) {
        match action {
            Action::Move(movement) => self.perform_move(movement),
            Action::Other(other) => self.perform_other(other),
            Action::Event(event) => self.perform_event(event),
            Action::Discard { role, card } => self.spend_card(*role, *card),
            Action::Choose { card, .. } => self.choose(*card),
        }
        if action.costs_action() {
            self.actions_left = self.actions_left.saturating_sub(1);
        }
    }

    /// Take a card from a player. Hand cards go to the discard pile; a
    /// reserved card leaves the game.
    fn spend_card(&mut self, role: Role, card: Card) {
        let source = self.player_mut(role).and_then(|p| p.remove_card(card));
        match source {
            Some(CardSource::Hand) => self.player_discard.discard(card),
            Some(CardSource::Reserve) => log::trace!("{} removes reserved {:?} from the game", role, card),
            None => {}
        }
    }

    fn move_pawn(&mut self, pawn: Role, to: CityId) {
        if let Some(player) = self.player_mut(pawn) {
            player.move_to(to);
        }
        self.sweep_cured();
    }

    fn perform_move(&mut self, movement: &Movement) {
        let payer = self.active_role();
        let pawn = movement.role();
        match *movement {
            Movement::Drive { .. } | Movement::ShuttleFlight { .. } | Movement::Dispatch { .. } => {}
            Movement::DirectFlight { to, .. } => self.spend_card(payer, Card::City(to)),
            Movement::CharterFlight { .. } => {
                if let Some(from) = self.player(pawn).map(|p| p.city()) {
                    self.spend_card(payer, Card::City(from));
                }
            }
            Movement::OperationsFlight { discard, .. } => {
                self.spend_card(payer, Card::City(discard));
                if let Some(player) = self.player_mut(payer) {
                    player.use_station_flight();
                }
            }
        }
        self.move_pawn(pawn, movement.destination());
    }

    fn perform_other(&mut self, other: &Other) {
        let actor = self.active_role();
        let caps = *self.active_player().capabilities();
        match *other {
            Other::TreatDisease { city, color } => {
                let amount = if caps.treats_all || self.is_cured(color) { MAX_MARKERS } else { 1 };
                self.remove_markers(city, color, amount);
            }
            Other::BuildResearchStation { city, displace } => {
                match displace {
                    Some(old) => self.cities[old.index()].station = false,
                    None => self.stations_left = self.stations_left.saturating_sub(1),
                }
                self.cities[city.index()].station = true;
                self.last_built_station = Some(city);
                if !caps.builds_without_card {
                    self.spend_card(actor, Card::City(city));
                }
            }
            Other::DiscoverCure { color } => {
                let offered: OrdSet<Card> = self
                    .active_player()
                    .cards_of_color(color, &self.graph)
                    .map(Card::City)
                    .collect();
                self.open_selection(
                    Phase::CureVirus,
                    CardSelection {
                        role: actor,
                        offered,
                        chosen: Vector::new(),
                        count: usize::from(caps.cure_threshold),
                        then: Continuation::DiscoverCure(color),
                    },
                );
            }
            Other::ShareKnowledge { giver, card, receiver } => {
                let card = Card::City(card);
                if self.player_mut(giver).and_then(|p| p.remove_card(card)).is_some() {
                    if let Some(player) = self.player_mut(receiver) {
                        player.add_card(card);
                    }
                }
            }
            Other::ReserveCard { card } => {
                let card = Card::Event(card);
                if self.player_discard.remove(&card) {
                    if let Some(player) = self.player_mut(actor) {
                        player.reserve(card);
                    }
                }
            }
        }
    }

    fn perform_event(&mut self, event: &Event) {
        if let Some(kind) = event.card() {
            self.spend_card(event.role(), Card::Event(kind));
        }
        match event {
            Event::Forecast { role } => {
                let count = self.config.forecast_depth.min(self.infection_deck.len());
                let offered: OrdSet<Card> = self.infection_deck.peek(count).map(|&c| Card::City(c)).collect();
                let phase = match self.config.forecast_mode {
                    ForecastMode::Sequential => Phase::ChooseCards,
                    ForecastMode::Permutations => Phase::Forecast,
                };
                self.open_selection(
                    phase,
                    CardSelection {
                        role: *role,
                        offered,
                        chosen: Vector::new(),
                        count,
                        then: Continuation::Forecast,
                    },
                );
            }
            Event::ForecastOrder { order, .. } => {
                self.infection_deck.reorder_top(order);
                self.close_selection();
            }
            Event::GovernmentGrant { role, city } => {
                self.cities[city.index()].station = true;
                self.last_built_station = Some(*city);
                if self.stations_left > 0 {
                    self.stations_left -= 1;
                } else {
                    self.pending_role = Some(*role);
                    self.enter_sub_phase(Phase::MoveStation);
                }
            }
            Event::Airlift { pawn, to, .. } => self.move_pawn(*pawn, *to),
            Event::ResilientPopulation { city, .. } => {
                self.infection_discard.remove(city);
            }
            Event::OneQuietNight { .. } => self.quiet_night = true,
            Event::MoveResearchStation { city, .. } => {
                self.cities[city.index()].station = false;
                self.pending_role = None;
                self.phase = self.resume_phase;
            }
        }
    }

    // =========================================================================
    // Sub-phases
    // =========================================================================

    fn enter_sub_phase(&mut self, phase: Phase) {
        log::trace!("entering {:?} from {:?}", phase, self.phase);
        self.resume_phase = self.phase;
        self.phase = phase;
    }

    fn open_selection(&mut self, phase: Phase, selection: CardSelection) {
        self.selection = Some(selection);
        self.enter_sub_phase(phase);
    }

    fn close_selection(&mut self) {
        self.selection = None;
        self.phase = self.resume_phase;
    }

    fn choose(&mut self, card: Card) {
        let complete = match self.selection.as_mut() {
            Some(selection) => {
                selection.chosen.push_back(card);
                selection.is_complete()
            }
            None => false,
        };
        if !complete {
            return;
        }
        let Some(selection) = self.selection.clone() else {
            return;
        };

        match selection.then {
            Continuation::DiscoverCure(color) => {
                for &card in &selection.chosen {
                    self.spend_card(selection.role, card);
                }
                self.cures[color.index()] = true;
                log::debug!("{} cured {} on turn {}", selection.role, color, self.turn);
                self.sweep_cured();
                if self.cure_count() == self.cures.len() {
                    self.win();
                }
            }
            Continuation::Forecast => {
                let order: Vec<CityId> = selection.chosen.iter().filter_map(|c| c.city()).collect();
                self.infection_deck.reorder_top(&order);
            }
        }
        self.close_selection();
    }

    // =========================================================================
    // Automatic phases
    // =========================================================================

    fn advance(&mut self) {
        match self.phase {
            Phase::DrawCards => self.draw_player_card(),
            Phase::Epidemic => self.intensify(),
            Phase::Infections => self.infection_step(),
            _ => {}
        }
    }

    fn draw_player_card(&mut self) {
        if self.drawn >= self.config.cards_per_turn {
            self.phase = Phase::Infections;
            return;
        }
        let Some(card) = self.player_deck.draw() else {
            self.lose(LossCause::PlayerDeckEmpty);
            return;
        };
        self.drawn += 1;

        if card.is_epidemic() {
            self.player_discard.discard(card);
            self.epidemic();
            self.phase = Phase::Epidemic;
            return;
        }

        let active = self.active;
        self.players[active].add_card(card);
        if self.drawn >= self.config.cards_per_turn {
            self.phase = Phase::Infections;
        }
    }

    /// Increase and infect.
    fn epidemic(&mut self) {
        let last = self.config.infection_rates.len().saturating_sub(1);
        self.infection_rate_index = (self.infection_rate_index + 1).min(last);

        if let Some(city) = self.infection_deck.draw_bottom() {
            let color = self.graph.color(city);
            log::debug!(
                "epidemic in {} on turn {}, infection rate now {}",
                self.graph.name(city),
                self.turn,
                self.infection_rate()
            );
            self.infect_and_spread(city, color, MAX_MARKERS);
            self.infection_discard.discard(city);
        }
    }

    /// Shuffle the infection discard pile back on top of the deck.
    fn intensify(&mut self) {
        let mut pile = self.infection_discard.take_all();
        pile.shuffle(&mut self.rng);
        self.infection_deck.place_on_top(pile);

        self.phase = if self.drawn >= self.config.cards_per_turn {
            Phase::Infections
        } else {
            Phase::DrawCards
        };
    }

    fn infection_step(&mut self) {
        if self.quiet_night {
            log::debug!("quiet night on turn {}", self.turn);
            self.quiet_night = false;
            self.end_turn();
            return;
        }
        if self.infections_done >= self.infection_rate() {
            self.end_turn();
            return;
        }
        let Some(city) = self.infection_deck.draw() else {
            self.end_turn();
            return;
        };
        let color = self.graph.color(city);
        self.infect_and_spread(city, color, 1);
        self.infection_discard.discard(city);
        self.infections_done += 1;

        if !self.status.is_over() && self.infections_done >= self.infection_rate() {
            self.end_turn();
        }
    }

    fn end_turn(&mut self) {
        self.active = (self.active + 1) % self.players.len();
        let active = self.active;
        self.players[active].start_turn();
        self.actions_left = self.config.actions_per_turn;
        self.drawn = 0;
        self.infections_done = 0;
        self.turn += 1;
        self.phase = Phase::Actions;
        self.resume_phase = Phase::Actions;
        log::trace!("turn {}: {} to act", self.turn, self.active_role());
    }
}

// =============================================================================
// Engine
// =============================================================================

/// A game with reset and reporting.
///
/// ```
/// use pandemic_sim::games::pandemic::{Engine, GameConfig};
///
/// let mut engine = Engine::new(GameConfig::default()).unwrap();
/// let first = engine
///     .legal_actions(None)
///     .into_iter()
///     .find(|a| a.costs_action())
///     .unwrap();
/// engine.step(Some(&first)).unwrap();
/// assert_eq!(engine.state().actions_left(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    initial: GameState,
    state: GameState,
}

impl Engine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::new(config)?))
    }

    pub fn with_graph(config: GameConfig, graph: Arc<CityGraph>) -> Result<Self, ConfigError> {
        Ok(Self::from_state(GameState::with_graph(config, graph)?))
    }

    /// Wrap an existing state; `reset` returns to it.
    #[must_use]
    pub fn from_state(state: GameState) -> Self {
        Self { initial: state.clone(), state }
    }

    /// Restart from the initial state.
    pub fn reset(&mut self) -> &GameState {
        self.state = self.initial.clone();
        &self.state
    }

    /// Start a new game with the same rules and a different seed.
    pub fn reseed(&mut self, seed: u64) -> Result<&GameState, ConfigError> {
        let config = self.state.config().clone().with_seed(seed);
        let graph = Arc::clone(&self.state.graph);
        *self = Self::with_graph(config, graph)?;
        Ok(&self.state)
    }

    pub fn step(&mut self, action: Option<&Action>) -> Result<&GameState, EngineError> {
        self.state.apply(action)?;
        Ok(&self.state)
    }

    #[must_use]
    pub fn legal_actions(&self, role: Option<Role>) -> Vec<Action> {
        self.state.legal_actions(role)
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.status().is_over()
    }

    /// One-line status summary.
    #[must_use]
    pub fn report(&self) -> String {
        let state = &self.state;
        let (color, cubes) = state.scarcest_color();
        format!(
            "active_player={}:{}, player_deck_size={}, infection_deck_size={}, infection_rate={}, outbreaks={}, min_cubes={}:{}",
            state.active_role(),
            state.actions_left(),
            state.player_deck().len(),
            state.infection_deck().len(),
            state.infection_rate(),
            state.outbreaks(),
            color,
            cubes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::pandemic::card::EventKind;
    use crate::games::pandemic::map::{cities::*, Color};
    use crate::games::pandemic::player::PlayerState;
    use crate::games::pandemic::state::GameStatus;

    fn game(roles: [Role; 2]) -> GameState {
        let config = GameConfig {
            initial_infection: vec![],
            ..GameConfig::default().with_roles(roles)
        };
        GameState::new(config).unwrap()
    }

    fn drive(role: Role, to: CityId) -> Action {
        Movement::Drive { role, to }.into()
    }

    #[test]
    fn test_actions_spend_budget_then_draw() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        for to in [CHICAGO, ATLANTA, CHICAGO, ATLANTA] {
            state.apply(Some(&drive(Role::Scientist, to))).unwrap();
        }
        assert_eq!(state.phase(), Phase::DrawCards);
        assert_eq!(state.actions_left(), 0);
    }

    #[test]
    fn test_illegal_action_rejected() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        let err = state.apply(Some(&drive(Role::Scientist, TOKYO))).unwrap_err();
        assert!(matches!(err, EngineError::IllegalAction { phase: Phase::Actions, .. }));
        assert_eq!(state.apply(None), Err(EngineError::DecisionPending(Phase::Actions)));
    }

    #[test]
    fn test_full_turn_passes_to_next_player() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.actions_left = 0;
        state.phase = Phase::DrawCards;
        // Keep the draws free of epidemics.
        state.player_deck = [PARIS, LONDON].map(Card::City).into_iter().collect();
        state.player_deck.discard(Card::City(MILAN));

        state.apply(None).unwrap();
        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Infections);
        assert!(state.active_player().holds(Card::City(MILAN)));

        state.apply(None).unwrap();
        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Actions);
        assert_eq!(state.active_role(), Role::Researcher);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.infection_discard().len(), 2);
    }

    #[test]
    fn test_empty_player_deck_loses() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.phase = Phase::DrawCards;
        state.actions_left = 0;
        state.player_deck = Default::default();

        state.apply(None).unwrap();
        assert_eq!(state.status(), GameStatus::Lost(LossCause::PlayerDeckEmpty));
        assert_eq!(state.apply(None), Err(EngineError::GameOver));
    }

    #[test]
    fn test_epidemic_intensifies() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.phase = Phase::DrawCards;
        state.actions_left = 0;
        state.player_deck = [Card::Epidemic(0), Card::City(PARIS), Card::City(LIMA)].into_iter().collect();
        let bottom = *state.infection_deck().iter().last().unwrap();

        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Epidemic);
        assert_eq!(state.infection_rate_index(), 1);
        assert_eq!(state.markers(bottom, state.graph().color(bottom)), 3);

        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::DrawCards);
        assert!(state.infection_discard().is_empty());
        assert_eq!(state.infection_deck().iter().next(), Some(&bottom));
    }

    #[test]
    fn test_quiet_night_skips_infections() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.phase = Phase::Infections;
        state.quiet_night = true;
        let deck = state.infection_deck().len();

        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Actions);
        assert_eq!(state.infection_deck().len(), deck);
        assert!(!state.quiet_night());
    }

    #[test]
    fn test_cure_selection_and_medic_sweep() {
        let mut state = game([Role::Medic, Role::Scientist]);
        state.players[0] = PlayerState::new(Role::Medic, ATLANTA);
        let blue = [CHICAGO, PARIS, LONDON, MADRID, MILAN];
        for city in blue {
            state.players[0].add_card(Card::City(city));
        }
        state.infect(ATLANTA, Color::Blue, 2).unwrap();
        // The medic refuses no markers until blue is cured.
        assert_eq!(state.markers(ATLANTA, Color::Blue), 2);

        state.apply(Some(&Other::DiscoverCure { color: Color::Blue }.into())).unwrap();
        assert_eq!(state.phase(), Phase::CureVirus);
        for city in blue {
            state.apply(Some(&Action::Choose { role: Role::Medic, card: Card::City(city) })).unwrap();
        }

        assert!(state.is_cured(Color::Blue));
        assert_eq!(state.phase(), Phase::Actions);
        assert_eq!(state.actions_left(), 3);
        assert_eq!(state.markers(ATLANTA, Color::Blue), 0);
        assert_eq!(state.player_discard().len(), 5);
        assert_eq!(state.active_player().card_count(), 0);
    }

    #[test]
    fn test_last_cure_wins() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.players[0] = PlayerState::new(Role::Scientist, ATLANTA);
        let red = [TOKYO, OSAKA, SEOUL, SHANGHAI];
        for city in red {
            state.players[0].add_card(Card::City(city));
        }
        state.cures = [true, true, true, false];

        state.apply(Some(&Other::DiscoverCure { color: Color::Red }.into())).unwrap();
        for city in red {
            state.apply(Some(&Action::Choose { role: Role::Scientist, card: Card::City(city) })).unwrap();
        }

        assert_eq!(state.status(), GameStatus::Won);
        assert!(state.legal_actions(None).is_empty());
        assert_eq!(state.apply(None), Err(EngineError::GameOver));
    }

    #[test]
    fn test_government_grant_with_empty_supply() {
        let mut state = game([Role::Medic, Role::Scientist]);
        state.players[1].add_card(Card::Event(EventKind::GovernmentGrant));
        state.cities[PARIS.index()].station = true;
        state.stations_left = 0;

        let grant: Action = Event::GovernmentGrant { role: Role::Scientist, city: TOKYO }.into();
        state.apply(Some(&grant)).unwrap();
        assert_eq!(state.phase(), Phase::MoveStation);
        assert_eq!(
            state.legal_actions(None),
            vec![
                Event::MoveResearchStation { role: Role::Scientist, city: ATLANTA }.into(),
                Event::MoveResearchStation { role: Role::Scientist, city: PARIS }.into(),
            ]
        );

        state.apply(Some(&Event::MoveResearchStation { role: Role::Scientist, city: PARIS }.into())).unwrap();
        assert_eq!(state.phase(), Phase::Actions);
        assert_eq!(state.stations().collect::<Vec<_>>(), vec![ATLANTA, TOKYO]);
        assert_eq!(state.actions_left(), 4);
    }

    fn holding(role: Role, cards: &[Card]) -> PlayerState {
        let mut player = PlayerState::new(role, ATLANTA);
        for &card in cards {
            player.add_card(card);
        }
        player
    }

    /// Only `role`'s discards are offered, whoever asks.
    fn assert_only_discards(state: &GameState, role: Role) {
        let held = state.player(role).unwrap().card_count();
        for asking in [None, Some(Role::Scientist), Some(Role::Researcher)] {
            let actions = state.legal_actions(asking);
            assert_eq!(actions.len(), held);
            assert!(actions
                .iter()
                .all(|a| matches!(a, Action::Discard { role: r, .. } if *r == role)));
        }
        let mut stuck = state.clone();
        assert_eq!(stuck.apply(None), Err(EngineError::DecisionPending(state.phase())));
        let quiet: Action = Event::OneQuietNight { role: Role::Scientist }.into();
        assert!(matches!(stuck.apply(Some(&quiet)), Err(EngineError::IllegalAction { .. })));
    }

    #[test]
    fn test_hand_limit_after_share_knowledge() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.players[0] = holding(
            Role::Scientist,
            &[Card::City(ATLANTA), Card::Event(EventKind::OneQuietNight)],
        );
        state.players[1] = holding(
            Role::Researcher,
            &[
                Card::City(PARIS),
                Card::City(LONDON),
                Card::City(MADRID),
                Card::City(MILAN),
                Card::City(ESSEN),
                Card::City(CHICAGO),
                Card::Event(EventKind::Airlift),
            ],
        );

        let share: Action = Other::ShareKnowledge {
            giver: Role::Scientist,
            card: ATLANTA,
            receiver: Role::Researcher,
        }
        .into();
        state.apply(Some(&share)).unwrap();
        assert_eq!(state.phase(), Phase::Actions);
        assert_eq!(state.actions_left(), 3);
        assert_only_discards(&state, Role::Researcher);

        let discard = Action::Discard { role: Role::Researcher, card: Card::Event(EventKind::Airlift) };
        state.apply(Some(&discard)).unwrap();
        assert!(!state.hand_limit_exceeded());
        assert_eq!(state.actions_left(), 3);
        assert!(state.legal_actions(None).contains(&drive(Role::Scientist, CHICAGO)));
    }

    #[test]
    fn test_hand_limit_during_epidemic() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.players[0] = holding(Role::Scientist, &[Card::Event(EventKind::OneQuietNight)]);
        state.phase = Phase::DrawCards;
        state.actions_left = 0;
        state.player_deck = [Card::Epidemic(0), Card::City(LIMA)].into_iter().collect();

        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Epidemic);
        for city in [PARIS, LONDON, MADRID, MILAN, ESSEN, CHICAGO, TOKYO] {
            state.players[0].add_card(Card::City(city));
        }
        assert_only_discards(&state, Role::Scientist);

        state.apply(Some(&Action::Discard { role: Role::Scientist, card: Card::City(TOKYO) })).unwrap();
        assert_eq!(state.phase(), Phase::Epidemic);
        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::DrawCards);
    }

    #[test]
    fn test_hand_limit_during_infections() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.players[0] = holding(
            Role::Scientist,
            &[
                Card::City(MADRID),
                Card::City(MILAN),
                Card::City(ESSEN),
                Card::City(CHICAGO),
                Card::City(TOKYO),
                Card::Event(EventKind::OneQuietNight),
            ],
        );
        state.players[1] = holding(Role::Researcher, &[Card::Event(EventKind::Airlift)]);
        state.phase = Phase::DrawCards;
        state.actions_left = 0;
        state.player_deck = [PARIS, LONDON, LIMA].map(Card::City).into_iter().collect();

        state.apply(None).unwrap();
        state.apply(None).unwrap();
        assert_eq!(state.phase(), Phase::Infections);
        assert_eq!(state.active_player().card_count(), 8);
        assert_only_discards(&state, Role::Scientist);

        let discard = Action::Discard { role: Role::Scientist, card: Card::Event(EventKind::OneQuietNight) };
        state.apply(Some(&discard)).unwrap();
        assert_eq!(state.phase(), Phase::Infections);
        assert!(state.legal_actions(None).iter().all(|a| matches!(a, Action::Event(_))));
        let deck = state.infection_deck().len();
        state.apply(None).unwrap();
        assert_eq!(state.infection_deck().len(), deck - 1);
    }

    #[test]
    fn test_other_roles_get_only_shared_actions() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        state.players[1].add_card(Card::Event(EventKind::OneQuietNight));

        let own = state.legal_actions(Some(Role::Scientist));
        assert_eq!(own, state.legal_actions(None));
        assert!(own.contains(&drive(Role::Scientist, CHICAGO)));

        let other = state.legal_actions(Some(Role::Researcher));
        assert!(!other.is_empty());
        assert!(other.iter().all(|a| matches!(a, Action::Event(_))));
        assert!(!other.contains(&drive(Role::Researcher, CHICAGO)));
        for action in other {
            let mut next = state.clone();
            assert_eq!(next.apply(Some(&action)), Ok(()));
        }
    }

    #[test]
    fn test_scarcest_color_breaks_ties_in_color_order() {
        let mut state = game([Role::Scientist, Role::Researcher]);
        assert_eq!(state.scarcest_color(), (Color::Blue, 24));

        state.cubes[Color::Red.index()] = 3;
        state.cubes[Color::Black.index()] = 3;
        assert_eq!(state.scarcest_color(), (Color::Black, 3));
    }

    #[test]
    fn test_report_format() {
        let engine = Engine::new(GameConfig::default().with_roles([Role::Medic, Role::Scientist])).unwrap();
        let report = engine.report();
        assert!(report.starts_with("active_player=medic:4, player_deck_size=49, infection_deck_size=39"));
        assert!(report.contains("infection_rate=2, outbreaks=0, min_cubes="));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut engine = Engine::new(GameConfig::default()).unwrap();
        let initial = engine.state().clone();
        let action = engine.legal_actions(None)[0].clone();
        engine.step(Some(&action)).unwrap();
        assert_ne!(engine.state(), &initial);
        assert_eq!(engine.reset(), &initial);
    }
}
