//! Per-player state: role, position and cards.

use im::OrdSet;

use super::card::{Card, EventKind};
use super::map::{CityGraph, CityId, Color};
use super::role::{Capabilities, Role};

/// One player's pawn and hand.
///
/// The hand is an ordered set so iteration, and therefore action
/// generation, is deterministic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    role: Role,
    caps: Capabilities,
    city: CityId,
    hand: OrdSet<Card>,
    reserved: Option<Card>,
    station_flight_used: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(role: Role, city: CityId) -> Self {
        Self {
            role,
            caps: role.capabilities(),
            city,
            hand: OrdSet::new(),
            reserved: None,
            station_flight_used: false,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    #[must_use]
    pub fn city(&self) -> CityId {
        self.city
    }

    #[must_use]
    pub fn hand(&self) -> &OrdSet<Card> {
        &self.hand
    }

    /// The contingency planner's reserved event card.
    #[must_use]
    pub fn reserved(&self) -> Option<Card> {
        self.reserved
    }

    /// Cards counted against the hand limit (the reserve slot is excluded).
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len()
    }

    #[must_use]
    pub fn holds(&self, card: Card) -> bool {
        self.hand.contains(&card) || self.reserved == Some(card)
    }

    pub fn city_cards(&self) -> impl Iterator<Item = CityId> + '_ {
        self.hand.iter().filter_map(|c| c.city())
    }

    /// Playable events: hand first, then the reserved card.
    pub fn event_cards(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.hand
            .iter()
            .filter_map(|c| c.event())
            .chain(self.reserved.and_then(Card::event))
    }

    /// City cards of `color` in hand.
    pub fn cards_of_color<'a>(
        &'a self,
        color: Color,
        graph: &'a CityGraph,
    ) -> impl Iterator<Item = CityId> + 'a {
        self.city_cards().filter(move |&c| graph.color(c) == color)
    }

    /// Whether the once-per-turn station flight is still available.
    #[must_use]
    pub fn station_flight_available(&self) -> bool {
        self.caps.station_flight && !self.station_flight_used
    }

    pub(crate) fn move_to(&mut self, city: CityId) {
        self.city = city;
    }

    pub(crate) fn add_card(&mut self, card: Card) {
        self.hand.insert(card);
    }

    /// Remove a card from the hand, or from the reserve slot.
    ///
    /// Returns where it came from, or `None` if the player did not hold it.
    pub(crate) fn remove_card(&mut self, card: Card) -> Option<CardSource> {
        if self.hand.remove(&card).is_some() {
            Some(CardSource::Hand)
        } else if self.reserved == Some(card) {
            self.reserved = None;
            Some(CardSource::Reserve)
        } else {
            None
        }
    }

    pub(crate) fn reserve(&mut self, card: Card) {
        self.reserved = Some(card);
    }

    pub(crate) fn use_station_flight(&mut self) {
        self.station_flight_used = true;
    }

    pub(crate) fn start_turn(&mut self) {
        self.station_flight_used = false;
    }
}

/// Where a removed card was held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardSource {
    Hand,
    Reserve,
}
