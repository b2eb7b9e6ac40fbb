//! Player and infection card identities.

use serde::{Deserialize, Serialize};

use super::map::CityId;

/// The five one-shot event cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    ResilientPopulation,
    OneQuietNight,
    Airlift,
    GovernmentGrant,
    Forecast,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::ResilientPopulation,
        EventKind::OneQuietNight,
        EventKind::Airlift,
        EventKind::GovernmentGrant,
        EventKind::Forecast,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::ResilientPopulation => "resilient_population",
            EventKind::OneQuietNight => "one_quiet_night",
            EventKind::Airlift => "airlift",
            EventKind::GovernmentGrant => "government_grant",
            EventKind::Forecast => "forecast",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<EventKind> {
        EventKind::ALL.into_iter().find(|e| e.name() == name)
    }
}

/// A player-deck card.
///
/// Epidemic cards carry an ordinal so every card in a deck is distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Card {
    City(CityId),
    Event(EventKind),
    Epidemic(u8),
}

impl Card {
    #[must_use]
    pub const fn city(self) -> Option<CityId> {
        match self {
            Card::City(city) => Some(city),
            _ => None,
        }
    }

    #[must_use]
    pub const fn event(self) -> Option<EventKind> {
        match self {
            Card::Event(kind) => Some(kind),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_city(self) -> bool {
        matches!(self, Card::City(_))
    }

    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Card::Event(_))
    }

    #[must_use]
    pub const fn is_epidemic(self) -> bool {
        matches!(self, Card::Epidemic(_))
    }
}

impl From<CityId> for Card {
    fn from(city: CityId) -> Self {
        Card::City(city)
    }
}

impl From<EventKind> for Card {
    fn from(kind: EventKind) -> Self {
        Card::Event(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::from_name("bribe"), None);
    }

    #[test]
    fn test_card_kinds() {
        let city = Card::from(CityId(3));
        assert!(city.is_city());
        assert_eq!(city.city(), Some(CityId(3)));
        assert_eq!(city.event(), None);

        let event = Card::from(EventKind::Airlift);
        assert!(event.is_event());
        assert_eq!(event.event(), Some(EventKind::Airlift));

        assert!(Card::Epidemic(0).is_epidemic());
    }

    #[test]
    fn test_city_cards_sort_first() {
        let mut cards = vec![Card::Epidemic(1), Card::Event(EventKind::Forecast), Card::City(CityId(9))];
        cards.sort();
        assert_eq!(cards[0], Card::City(CityId(9)));
    }
}
