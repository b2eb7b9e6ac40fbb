//! The city graph: identities, adjacency and disease colors.
//!
//! A `CityGraph` is built once and shared behind an `Arc` by every game
//! state cloned from it. City ids are dense indices into the graph, which
//! lets per-city state live in a flat vector.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

// =============================================================================
// Colors
// =============================================================================

/// Disease color. Every city belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Yellow,
    Black,
    Red,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Blue, Color::Yellow, Color::Black, Color::Red];

    /// Dense index for per-color arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Black => "black",
            Color::Red => "red",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Cities
// =============================================================================

/// Dense city identifier, an index into its `CityGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(pub u8);

impl CityId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static description of one city.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct City {
    pub name: String,
    pub color: Color,
    pub neighbors: SmallVec<[CityId; 6]>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("city {0} is not on the map")]
    UnknownCity(u8),
    #[error("a map holds at most 256 cities, got {0}")]
    TooManyCities(usize),
}

/// Undirected city graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityGraph {
    cities: Vec<City>,
}

impl CityGraph {
    /// The standard 48-city world map.
    #[must_use]
    pub fn standard() -> Self {
        let mut graph = Self {
            cities: STANDARD_CITIES
                .iter()
                .map(|&(name, color)| City {
                    name: name.to_string(),
                    color,
                    neighbors: SmallVec::new(),
                })
                .collect(),
        };
        for &(a, b) in STANDARD_EDGES.iter() {
            graph.connect(a, b);
        }
        graph
    }

    /// Build a custom map. Duplicate edges and self loops are ignored.
    pub fn from_edges<S: Into<String>>(
        cities: impl IntoIterator<Item = (S, Color)>,
        edges: &[(CityId, CityId)],
    ) -> Result<Self, MapError> {
        let cities: Vec<City> = cities
            .into_iter()
            .map(|(name, color)| City {
                name: name.into(),
                color,
                neighbors: SmallVec::new(),
            })
            .collect();
        if cities.len() > usize::from(u8::MAX) + 1 {
            return Err(MapError::TooManyCities(cities.len()));
        }

        let mut graph = Self { cities };
        for &(a, b) in edges {
            graph.check(a)?;
            graph.check(b)?;
            graph.connect(a, b);
        }
        Ok(graph)
    }

    fn connect(&mut self, a: CityId, b: CityId) {
        if a == b || self.cities[a.index()].neighbors.contains(&b) {
            return;
        }
        self.cities[a.index()].neighbors.push(b);
        self.cities[b.index()].neighbors.push(a);
        self.cities[a.index()].neighbors.sort_unstable();
        self.cities[b.index()].neighbors.sort_unstable();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// `Ok(id)` if `id` names a city on this map.
    pub fn check(&self, id: CityId) -> Result<CityId, MapError> {
        if id.index() < self.cities.len() {
            Ok(id)
        } else {
            Err(MapError::UnknownCity(id.0))
        }
    }

    /// All city ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = CityId> {
        (0..self.cities.len()).map(|i| CityId(i as u8))
    }

    #[must_use]
    pub fn city(&self, id: CityId) -> &City {
        &self.cities[id.index()]
    }

    #[must_use]
    pub fn name(&self, id: CityId) -> &str {
        &self.cities[id.index()].name
    }

    #[must_use]
    pub fn color(&self, id: CityId) -> Color {
        self.cities[id.index()].color
    }

    #[must_use]
    pub fn neighbors(&self, id: CityId) -> &[CityId] {
        &self.cities[id.index()].neighbors
    }

    #[must_use]
    pub fn are_adjacent(&self, a: CityId, b: CityId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.cities.iter().map(|c| c.neighbors.len()).sum::<usize>() / 2
    }

    /// Command-token form of a city name: lower case, words joined by `_`.
    #[must_use]
    pub fn token(&self, id: CityId) -> String {
        tokenize(self.name(id))
    }

    /// Look up a city by token or display name, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<CityId> {
        let wanted = tokenize(name);
        self.ids().find(|&id| self.token(id) == wanted)
    }
}

fn tokenize(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| word.replace('.', "").to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

// =============================================================================
// Standard map data
// =============================================================================

/// Ids of the standard map's cities.
pub mod cities {
    use super::CityId;

    pub const ALGIERS: CityId = CityId(0);
    pub const ATLANTA: CityId = CityId(1);
    pub const BAGHDAD: CityId = CityId(2);
    pub const BANGKOK: CityId = CityId(3);
    pub const BEIJING: CityId = CityId(4);
    pub const BOGOTA: CityId = CityId(5);
    pub const BUENOS_AIRES: CityId = CityId(6);
    pub const CAIRO: CityId = CityId(7);
    pub const CHENNAI: CityId = CityId(8);
    pub const CHICAGO: CityId = CityId(9);
    pub const DELHI: CityId = CityId(10);
    pub const ESSEN: CityId = CityId(11);
    pub const HO_CHI_MINH_CITY: CityId = CityId(12);
    pub const HONG_KONG: CityId = CityId(13);
    pub const ISTANBUL: CityId = CityId(14);
    pub const JAKARTA: CityId = CityId(15);
    pub const JOHANNESBURG: CityId = CityId(16);
    pub const KARACHI: CityId = CityId(17);
    pub const KHARTOUM: CityId = CityId(18);
    pub const KINSHASA: CityId = CityId(19);
    pub const KOLKATA: CityId = CityId(20);
    pub const LAGOS: CityId = CityId(21);
    pub const LIMA: CityId = CityId(22);
    pub const LONDON: CityId = CityId(23);
    pub const LOS_ANGELES: CityId = CityId(24);
    pub const MADRID: CityId = CityId(25);
    pub const MANILA: CityId = CityId(26);
    pub const MEXICO_CITY: CityId = CityId(27);
    pub const MIAMI: CityId = CityId(28);
    pub const MILAN: CityId = CityId(29);
    pub const MONTREAL: CityId = CityId(30);
    pub const MOSCOW: CityId = CityId(31);
    pub const MUMBAI: CityId = CityId(32);
    pub const NEW_YORK: CityId = CityId(33);
    pub const OSAKA: CityId = CityId(34);
    pub const PARIS: CityId = CityId(35);
    pub const RIYADH: CityId = CityId(36);
    pub const SAN_FRANCISCO: CityId = CityId(37);
    pub const SANTIAGO: CityId = CityId(38);
    pub const SAO_PAULO: CityId = CityId(39);
    pub const SEOUL: CityId = CityId(40);
    pub const SHANGHAI: CityId = CityId(41);
    pub const ST_PETERSBURG: CityId = CityId(42);
    pub const SYDNEY: CityId = CityId(43);
    pub const TAIPEI: CityId = CityId(44);
    pub const TEHRAN: CityId = CityId(45);
    pub const TOKYO: CityId = CityId(46);
    pub const WASHINGTON: CityId = CityId(47);
}

use cities::*;

const STANDARD_CITIES: [(&str, Color); 48] = [
    ("Algiers", Color::Black),
    ("Atlanta", Color::Blue),
    ("Baghdad", Color::Black),
    ("Bangkok", Color::Red),
    ("Beijing", Color::Red),
    ("Bogota", Color::Yellow),
    ("Buenos Aires", Color::Yellow),
    ("Cairo", Color::Black),
    ("Chennai", Color::Black),
    ("Chicago", Color::Blue),
    ("Delhi", Color::Black),
    ("Essen", Color::Blue),
    ("Ho Chi Minh City", Color::Red),
    ("Hong Kong", Color::Red),
    ("Istanbul", Color::Black),
    ("Jakarta", Color::Red),
    ("Johannesburg", Color::Yellow),
    ("Karachi", Color::Black),
    ("Khartoum", Color::Yellow),
    ("Kinshasa", Color::Yellow),
    ("Kolkata", Color::Black),
    ("Lagos", Color::Yellow),
    ("Lima", Color::Yellow),
    ("London", Color::Blue),
    ("Los Angeles", Color::Yellow),
    ("Madrid", Color::Blue),
    ("Manila", Color::Red),
    ("Mexico City", Color::Yellow),
    ("Miami", Color::Yellow),
    ("Milan", Color::Blue),
    ("Montreal", Color::Blue),
    ("Moscow", Color::Black),
    ("Mumbai", Color::Black),
    ("New York", Color::Blue),
    ("Osaka", Color::Red),
    ("Paris", Color::Blue),
    ("Riyadh", Color::Black),
    ("San Francisco", Color::Blue),
    ("Santiago", Color::Yellow),
    ("Sao Paulo", Color::Yellow),
    ("Seoul", Color::Red),
    ("Shanghai", Color::Red),
    ("St. Petersburg", Color::Blue),
    ("Sydney", Color::Red),
    ("Taipei", Color::Red),
    ("Tehran", Color::Black),
    ("Tokyo", Color::Red),
    ("Washington", Color::Blue),
];

const STANDARD_EDGES: [(CityId, CityId); 90] = [
    (ALGIERS, CAIRO),
    (ALGIERS, ISTANBUL),
    (ALGIERS, MADRID),
    (ALGIERS, PARIS),
    (ATLANTA, CHICAGO),
    (ATLANTA, MIAMI),
    (ATLANTA, WASHINGTON),
    (BAGHDAD, CAIRO),
    (BAGHDAD, ISTANBUL),
    (BAGHDAD, KARACHI),
    (BAGHDAD, RIYADH),
    (BAGHDAD, TEHRAN),
    (BANGKOK, CHENNAI),
    (BANGKOK, HO_CHI_MINH_CITY),
    (BANGKOK, HONG_KONG),
    (BANGKOK, JAKARTA),
    (BANGKOK, KOLKATA),
    (BEIJING, SEOUL),
    (BEIJING, SHANGHAI),
    (BOGOTA, BUENOS_AIRES),
    (BOGOTA, LIMA),
    (BOGOTA, MEXICO_CITY),
    (BOGOTA, MIAMI),
    (BOGOTA, SAO_PAULO),
    (BUENOS_AIRES, SAO_PAULO),
    (CAIRO, ISTANBUL),
    (CAIRO, KHARTOUM),
    (CAIRO, RIYADH),
    (CHENNAI, DELHI),
    (CHENNAI, JAKARTA),
    (CHENNAI, KOLKATA),
    (CHENNAI, MUMBAI),
    (CHICAGO, LOS_ANGELES),
    (CHICAGO, MEXICO_CITY),
    (CHICAGO, MONTREAL),
    (CHICAGO, SAN_FRANCISCO),
    (DELHI, KARACHI),
    (DELHI, KOLKATA),
    (DELHI, MUMBAI),
    (DELHI, TEHRAN),
    (ESSEN, LONDON),
    (ESSEN, MILAN),
    (ESSEN, PARIS),
    (ESSEN, ST_PETERSBURG),
    (HO_CHI_MINH_CITY, HONG_KONG),
    (HO_CHI_MINH_CITY, JAKARTA),
    (HO_CHI_MINH_CITY, MANILA),
    (HONG_KONG, KOLKATA),
    (HONG_KONG, SHANGHAI),
    (HONG_KONG, TAIPEI),
    (ISTANBUL, MILAN),
    (ISTANBUL, MOSCOW),
    (ISTANBUL, ST_PETERSBURG),
    (JAKARTA, SYDNEY),
    (JOHANNESBURG, KHARTOUM),
    (JOHANNESBURG, KINSHASA),
    (KARACHI, MUMBAI),
    (KARACHI, RIYADH),
    (KARACHI, TEHRAN),
    (KHARTOUM, KINSHASA),
    (KHARTOUM, LAGOS),
    (KINSHASA, LAGOS),
    (LAGOS, SAO_PAULO),
    (LIMA, MEXICO_CITY),
    (LIMA, SANTIAGO),
    (LONDON, MADRID),
    (LONDON, NEW_YORK),
    (LONDON, PARIS),
    (LOS_ANGELES, MEXICO_CITY),
    (LOS_ANGELES, SAN_FRANCISCO),
    (LOS_ANGELES, SYDNEY),
    (MADRID, NEW_YORK),
    (MADRID, SAO_PAULO),
    (MANILA, SAN_FRANCISCO),
    (MANILA, SYDNEY),
    (MANILA, TAIPEI),
    (MEXICO_CITY, MIAMI),
    (MIAMI, WASHINGTON),
    (MILAN, PARIS),
    (MONTREAL, NEW_YORK),
    (MONTREAL, WASHINGTON),
    (MOSCOW, ST_PETERSBURG),
    (MOSCOW, TEHRAN),
    (NEW_YORK, WASHINGTON),
    (OSAKA, TAIPEI),
    (OSAKA, TOKYO),
    (SAN_FRANCISCO, TOKYO),
    (SEOUL, SHANGHAI),
    (SEOUL, TOKYO),
    (SHANGHAI, TOKYO),
];
