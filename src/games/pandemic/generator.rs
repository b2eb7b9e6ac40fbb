//! Legal action generation.
//!
//! A pure function of the state and the acting role. Generation order is
//! fixed (events, then movement, then other actions, each in id order), so
//! the same state always yields the same action list. Search relies on that
//! because it refers to actions by index.

use smallvec::SmallVec;

use super::action::{Action, Event, Movement, Other};
use super::card::{Card, EventKind};
use super::map::{CityId, Color};
use super::player::PlayerState;
use super::role::Role;
use super::state::{GameState, Phase};

impl GameState {
    /// Every action the engine accepts right now.
    ///
    /// Events, discards and sub-phase choices are the same for everyone.
    /// Movement and board actions belong to the active player only, so
    /// asking for any other `role` leaves them out. `None` means the active
    /// player. Every returned action is accepted by
    /// [`apply`](Self::apply).
    #[must_use]
    pub fn legal_actions(&self, role: Option<Role>) -> Vec<Action> {
        if self.status.is_over() {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.hand_limit_exceeded() {
            self.discard_actions(&mut actions);
            return actions;
        }

        match self.phase {
            Phase::ChooseCards | Phase::CureVirus => self.choose_actions(&mut actions),
            Phase::Forecast => self.forecast_orders(&mut actions),
            Phase::MoveStation => self.move_station_actions(&mut actions),
            Phase::Setup => {}
            Phase::Actions | Phase::DrawCards | Phase::Epidemic | Phase::Infections => {
                self.event_actions(&mut actions);
                let active = self.active_role();
                if self.phase == Phase::Actions && role.map_or(true, |r| r == active) {
                    if let Some(player) = self.player(active) {
                        self.movement_actions(player, &mut actions);
                        self.other_actions(player, &mut actions);
                    }
                }
            }
        }
        actions
    }

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    fn discard_actions(&self, out: &mut Vec<Action>) {
        let limit = self.config.hand_limit;
        for player in self.players.iter().filter(|p| p.card_count() > limit) {
            for &card in player.hand() {
                out.push(Action::Discard { role: player.role(), card });
            }
        }
    }

    fn choose_actions(&self, out: &mut Vec<Action>) {
        if let Some(selection) = &self.selection {
            for card in selection.remaining() {
                out.push(Action::Choose { role: selection.role, card });
            }
        }
    }

    fn forecast_orders(&self, out: &mut Vec<Action>) {
        let Some(selection) = &self.selection else {
            return;
        };
        let top: SmallVec<[CityId; 6]> = self.infection_deck.peek(selection.count).copied().collect();
        for order in permutations(&top) {
            out.push(Action::Event(Event::ForecastOrder { role: selection.role, order }));
        }
    }

    fn move_station_actions(&self, out: &mut Vec<Action>) {
        let Some(role) = self.pending_role else {
            return;
        };
        for city in self.stations().filter(|&c| Some(c) != self.last_built_station) {
            out.push(Action::Event(Event::MoveResearchStation { role, city }));
        }
    }

    // =========================================================================
    // Events
    // =========================================================================

    fn event_actions(&self, out: &mut Vec<Action>) {
        for player in &self.players {
            let role = player.role();
            for kind in player.event_cards() {
                match kind {
                    EventKind::ResilientPopulation => {
                        for &city in self.infection_discard.iter() {
                            out.push(Event::ResilientPopulation { role, city }.into());
                        }
                    }
                    EventKind::OneQuietNight => {
                        out.push(Event::OneQuietNight { role }.into());
                    }
                    EventKind::Airlift => {
                        for pawn in &self.players {
                            for to in self.graph.ids().filter(|&c| c != pawn.city()) {
                                out.push(Event::Airlift { role, pawn: pawn.role(), to }.into());
                            }
                        }
                    }
                    EventKind::GovernmentGrant => {
                        for city in self.graph.ids().filter(|&c| !self.has_station(c)) {
                            out.push(Event::GovernmentGrant { role, city }.into());
                        }
                    }
                    EventKind::Forecast => {
                        if !self.infection_deck.is_empty() {
                            out.push(Event::Forecast { role }.into());
                        }
                    }
                }
            }
        }
    }

    // =========================================================================
    // Movement
    // =========================================================================

    fn movement_actions(&self, player: &PlayerState, out: &mut Vec<Action>) {
        if player.capabilities().moves_other_pawns {
            for pawn in &self.players {
                self.pawn_moves(pawn, player, out);
            }
            self.dispatches(out);
        } else {
            self.pawn_moves(player, player, out);
        }

        if player.station_flight_available() && self.has_station(player.city()) {
            let role = player.role();
            for discard in player.city_cards() {
                for to in self.graph.ids().filter(|&c| c != player.city()) {
                    out.push(Movement::OperationsFlight { role, to, discard }.into());
                }
            }
        }
    }

    /// Standard moves for `pawn`, paid for with `payer`'s cards.
    fn pawn_moves(&self, pawn: &PlayerState, payer: &PlayerState, out: &mut Vec<Action>) {
        let role = pawn.role();
        let here = pawn.city();

        for &to in self.graph.neighbors(here) {
            out.push(Movement::Drive { role, to }.into());
        }
        for to in payer.city_cards().filter(|&c| c != here) {
            out.push(Movement::DirectFlight { role, to }.into());
        }
        if payer.hand().contains(&Card::City(here)) {
            for to in self.graph.ids().filter(|&c| c != here) {
                out.push(Movement::CharterFlight { role, to }.into());
            }
        }
        if self.has_station(here) {
            for to in self.stations().filter(|&c| c != here) {
                out.push(Movement::ShuttleFlight { role, to }.into());
            }
        }
    }

    /// Moves of any pawn to a city holding another pawn.
    fn dispatches(&self, out: &mut Vec<Action>) {
        for pawn in &self.players {
            let mut targets: SmallVec<[CityId; 4]> = SmallVec::new();
            for other in &self.players {
                let to = other.city();
                if to != pawn.city() && !targets.contains(&to) {
                    targets.push(to);
                }
            }
            for to in targets {
                out.push(Movement::Dispatch { role: pawn.role(), to }.into());
            }
        }
    }

    // =========================================================================
    // Other actions
    // =========================================================================

    fn other_actions(&self, player: &PlayerState, out: &mut Vec<Action>) {
        let here = player.city();
        let caps = player.capabilities();

        for color in Color::ALL {
            if self.markers(here, color) > 0 {
                out.push(Other::TreatDisease { city: here, color }.into());
            }
        }

        if !self.has_station(here)
            && (caps.builds_without_card || player.hand().contains(&Card::City(here)))
        {
            if self.stations_left > 0 {
                out.push(Other::BuildResearchStation { city: here, displace: None }.into());
            } else {
                for station in self.stations() {
                    out.push(Other::BuildResearchStation { city: here, displace: Some(station) }.into());
                }
            }
        }

        if self.has_station(here) {
            for color in Color::ALL {
                let held = player.cards_of_color(color, &self.graph).count();
                if !self.is_cured(color) && held >= usize::from(caps.cure_threshold) {
                    out.push(Other::DiscoverCure { color }.into());
                }
            }
        }

        self.share_actions(player, out);

        if caps.reserves_events && player.reserved().is_none() {
            for kind in self.player_discard.iter().filter_map(|c| c.event()) {
                out.push(Other::ReserveCard { card: kind }.into());
            }
        }
    }

    /// Giving and receiving are generated separately; each direction has its
    /// own holder and its own any-card override.
    fn share_actions(&self, player: &PlayerState, out: &mut Vec<Action>) {
        let here = player.city();
        let here_card = Card::City(here);

        for other in self.players.iter().filter(|o| o.role() != player.role() && o.city() == here) {
            if player.capabilities().gives_any_city_card {
                for card in player.city_cards() {
                    out.push(Other::ShareKnowledge { giver: player.role(), card, receiver: other.role() }.into());
                }
            } else if player.hand().contains(&here_card) {
                out.push(Other::ShareKnowledge { giver: player.role(), card: here, receiver: other.role() }.into());
            }

            if other.capabilities().gives_any_city_card {
                for card in other.city_cards() {
                    out.push(Other::ShareKnowledge { giver: other.role(), card, receiver: player.role() }.into());
                }
            } else if other.hand().contains(&here_card) {
                out.push(Other::ShareKnowledge { giver: other.role(), card: here, receiver: player.role() }.into());
            }
        }
    }
}

/// All orderings of `items`, in lexicographic order of positions.
fn permutations(items: &[CityId]) -> Vec<SmallVec<[CityId; 6]>> {
    fn extend(
        items: &[CityId],
        used: &mut [bool],
        current: &mut SmallVec<[CityId; 6]>,
        out: &mut Vec<SmallVec<[CityId; 6]>>,
    ) {
        if current.len() == items.len() {
            out.push(current.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            current.push(items[i]);
            extend(items, used, current, out);
            current.pop();
            used[i] = false;
        }
    }

    let mut out = Vec::new();
    let mut used = vec![false; items.len()];
    extend(items, &mut used, &mut SmallVec::new(), &mut out);
    out
}
