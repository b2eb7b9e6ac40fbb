//! Player actions as a closed sum type.
//!
//! Four families mirror the command prefixes: movement (`m`), other board
//! actions (`o`), event cards (`e`) and the bookkeeping choices (`t`) used
//! for hand-limit discards and card-selection sub-phases. Actions are plain
//! values; two actions are the same action iff they are equal.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, EventKind};
use super::map::{CityId, Color};
use super::role::Role;

/// Pawn movement. `role` is the pawn being moved; the active player pays.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Move to an adjacent city.
    Drive { role: Role, to: CityId },
    /// Discard the destination's card.
    DirectFlight { role: Role, to: CityId },
    /// Discard the card of the pawn's current city to go anywhere.
    CharterFlight { role: Role, to: CityId },
    /// Station to station.
    ShuttleFlight { role: Role, to: CityId },
    /// Dispatcher: move a pawn to a city holding another pawn.
    Dispatch { role: Role, to: CityId },
    /// Operations expert: from a station, discard any city card to go anywhere.
    OperationsFlight { role: Role, to: CityId, discard: CityId },
}

impl Movement {
    #[must_use]
    pub fn role(&self) -> Role {
        match *self {
            Movement::Drive { role, .. }
            | Movement::DirectFlight { role, .. }
            | Movement::CharterFlight { role, .. }
            | Movement::ShuttleFlight { role, .. }
            | Movement::Dispatch { role, .. }
            | Movement::OperationsFlight { role, .. } => role,
        }
    }

    #[must_use]
    pub fn destination(&self) -> CityId {
        match *self {
            Movement::Drive { to, .. }
            | Movement::DirectFlight { to, .. }
            | Movement::CharterFlight { to, .. }
            | Movement::ShuttleFlight { to, .. }
            | Movement::Dispatch { to, .. }
            | Movement::OperationsFlight { to, .. } => to,
        }
    }
}

/// Non-movement board actions taken by the active player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Other {
    TreatDisease { city: CityId, color: Color },
    /// Build here; `displace` names the station to move when the supply is empty.
    BuildResearchStation { city: CityId, displace: Option<CityId> },
    /// Start a cure; the paying cards are picked in the `CureVirus` phase.
    DiscoverCure { color: Color },
    ShareKnowledge { giver: Role, card: CityId, receiver: Role },
    /// Contingency planner: take an event card back from the discard pile.
    ReserveCard { card: EventKind },
}

/// Event-card plays and their follow-up decisions. `role` plays the card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    Forecast { role: Role },
    /// New order for the top infection cards, top first.
    ForecastOrder { role: Role, order: SmallVec<[CityId; 6]> },
    GovernmentGrant { role: Role, city: CityId },
    Airlift { role: Role, pawn: Role, to: CityId },
    /// Remove a card from the infection discard pile for good.
    ResilientPopulation { role: Role, city: CityId },
    OneQuietNight { role: Role },
    /// Remove the station at `city` to free one for a pending grant.
    MoveResearchStation { role: Role, city: CityId },
}

impl Event {
    #[must_use]
    pub fn role(&self) -> Role {
        match *self {
            Event::Forecast { role }
            | Event::ForecastOrder { role, .. }
            | Event::GovernmentGrant { role, .. }
            | Event::Airlift { role, .. }
            | Event::ResilientPopulation { role, .. }
            | Event::OneQuietNight { role }
            | Event::MoveResearchStation { role, .. } => role,
        }
    }

    /// The event card this play consumes, if it is a card play.
    #[must_use]
    pub fn card(&self) -> Option<EventKind> {
        match self {
            Event::Forecast { .. } => Some(EventKind::Forecast),
            Event::GovernmentGrant { .. } => Some(EventKind::GovernmentGrant),
            Event::Airlift { .. } => Some(EventKind::Airlift),
            Event::ResilientPopulation { .. } => Some(EventKind::ResilientPopulation),
            Event::OneQuietNight { .. } => Some(EventKind::OneQuietNight),
            Event::ForecastOrder { .. } | Event::MoveResearchStation { .. } => None,
        }
    }
}

/// Any action a caller can submit to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Move(Movement),
    Other(Other),
    Event(Event),
    /// Hand-limit discard.
    Discard { role: Role, card: Card },
    /// One pick in a card-selection sub-phase.
    Choose { role: Role, card: Card },
}

impl Action {
    /// Whether the action spends from the active player's turn budget.
    #[must_use]
    pub fn costs_action(&self) -> bool {
        match self {
            Action::Move(Movement::OperationsFlight { .. }) => false,
            Action::Move(_) | Action::Other(_) => true,
            Action::Event(_) | Action::Discard { .. } | Action::Choose { .. } => false,
        }
    }
}

impl From<Movement> for Action {
    fn from(m: Movement) -> Self {
        Action::Move(m)
    }
}

impl From<Other> for Action {
    fn from(o: Other) -> Self {
        Action::Other(o)
    }
}

impl From<Event> for Action {
    fn from(e: Event) -> Self {
        Action::Event(e)
    }
}
