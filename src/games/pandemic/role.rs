//! Roles and their capability records.
//!
//! Each role resolves once, at assignment, to a [`Capabilities`] value. Action
//! generation and the mutation routines read these flags; nothing else
//! branches on the role itself.

use serde::{Deserialize, Serialize};

/// One of the seven distinct player roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    ContingencyPlanner,
    Dispatcher,
    Medic,
    OperationsExpert,
    QuarantineSpecialist,
    Researcher,
    Scientist,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::ContingencyPlanner,
        Role::Dispatcher,
        Role::Medic,
        Role::OperationsExpert,
        Role::QuarantineSpecialist,
        Role::Researcher,
        Role::Scientist,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Role::ContingencyPlanner => "contingency_planner",
            Role::Dispatcher => "dispatcher",
            Role::Medic => "medic",
            Role::OperationsExpert => "operations_expert",
            Role::QuarantineSpecialist => "quarantine_specialist",
            Role::Researcher => "researcher",
            Role::Scientist => "scientist",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.name() == name)
    }

    /// The capability record for this role.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        let base = Capabilities::BASE;
        match self {
            Role::ContingencyPlanner => Capabilities { reserves_events: true, ..base },
            Role::Dispatcher => Capabilities { moves_other_pawns: true, ..base },
            Role::Medic => Capabilities { treats_all: true, ..base },
            Role::OperationsExpert => Capabilities {
                builds_without_card: true,
                station_flight: true,
                ..base
            },
            Role::QuarantineSpecialist => Capabilities { quarantines_neighbors: true, ..base },
            Role::Researcher => Capabilities { gives_any_city_card: true, ..base },
            Role::Scientist => Capabilities { cure_threshold: 4, ..base },
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule overrides a role carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capabilities {
    /// Same-color city cards needed to discover a cure.
    pub cure_threshold: u8,
    /// May move other pawns, paying with its own cards, or join pawns.
    pub moves_other_pawns: bool,
    /// Treating removes every marker; cured colors never stay near it.
    pub treats_all: bool,
    /// Its city and the neighbors receive no new markers.
    pub quarantines_neighbors: bool,
    /// Keeps one event card from the discard pile in a reserve slot.
    pub reserves_events: bool,
    /// Once per turn, from a station, discard any city card to fly anywhere.
    pub station_flight: bool,
    /// Builds stations without discarding the city card.
    pub builds_without_card: bool,
    /// May give any city card, not only the current city's.
    pub gives_any_city_card: bool,
}

impl Capabilities {
    pub const BASE: Capabilities = Capabilities {
        cure_threshold: 5,
        moves_other_pawns: false,
        treats_all: false,
        quarantines_neighbors: false,
        reserves_events: false,
        station_flight: false,
        builds_without_card: false,
        gives_any_city_card: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::BASE
    }
}
