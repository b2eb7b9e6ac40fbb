//! Infection, outbreak and treatment.
//!
//! These routines keep one invariant: for every color, cubes in the supply
//! plus markers on the board equal `cubes_per_color`. A marker is only
//! placed after its cube leaves the supply, and every removed marker goes
//! back.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use super::map::{CityId, Color, MapError};
use super::state::{GameState, LossCause, Phase};

/// Markers a city can hold per color.
pub const MAX_MARKERS: u8 = 3;

/// What a single `infect` call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Infection {
    /// Markers placed.
    pub placed: u8,
    /// The city was already full and would have taken another marker.
    pub overflowed: bool,
}

impl GameState {
    /// Whether `city` currently refuses new `color` markers.
    ///
    /// A cured color is refused once it is eradicated (supply back to full)
    /// or when the city hosts a treat-all role. Outside setup, a quarantining
    /// role shields its city and the neighbors from every color.
    #[must_use]
    pub fn is_protected(&self, city: CityId, color: Color) -> bool {
        if self.phase != Phase::Setup {
            let quarantined = self.players.iter().any(|p| {
                p.capabilities().quarantines_neighbors
                    && (p.city() == city || self.graph.are_adjacent(p.city(), city))
            });
            if quarantined {
                return true;
            }
        }

        if self.is_cured(color) {
            if self.cubes_left(color) == self.config.cubes_per_color {
                return true;
            }
            let medic_here = self
                .players
                .iter()
                .any(|p| p.capabilities().treats_all && p.city() == city);
            if medic_here {
                return true;
            }
        }
        false
    }

    /// Place up to `times` markers of `color` on `city`.
    ///
    /// Stops at the first marker that would exceed [`MAX_MARKERS`] and reports
    /// the overflow; the caller decides whether that becomes an outbreak.
    /// Needing a cube from an empty supply loses the game.
    pub fn infect(&mut self, city: CityId, color: Color, times: u8) -> Result<Infection, MapError> {
        let city = self.graph.check(city)?;
        Ok(self.place_markers(city, color, times))
    }

    fn place_markers(&mut self, city: CityId, color: Color, times: u8) -> Infection {
        let mut result = Infection::default();
        if self.is_protected(city, color) {
            return result;
        }

        let c = color.index();
        for _ in 0..times {
            if self.cities[city.index()].markers[c] >= MAX_MARKERS {
                result.overflowed = true;
                break;
            }
            if self.cubes[c] == 0 {
                self.lose(LossCause::CubesExhausted(color));
                break;
            }
            self.cubes[c] -= 1;
            self.cities[city.index()].markers[c] += 1;
            result.placed += 1;
        }
        result
    }

    /// Infect and resolve any resulting outbreak chain.
    pub(crate) fn infect_and_spread(&mut self, city: CityId, color: Color, times: u8) {
        if self.place_markers(city, color, times).overflowed {
            self.spread_from(city, color, &mut FxHashSet::default());
        }
    }

    /// Start an outbreak chain at `city`. Returns the number of outbreaks.
    pub fn outbreak(&mut self, city: CityId, color: Color) -> Result<usize, MapError> {
        self.outbreak_with(city, color, &mut FxHashSet::default())
    }

    /// Outbreak cascade sharing `visited` with the caller.
    ///
    /// Each city in `visited` has already broken out in this chain and is
    /// neither counted nor infected again. Every new outbreak infects each
    /// neighbor once; neighbors that overflow join the worklist.
    pub fn outbreak_with(
        &mut self,
        city: CityId,
        color: Color,
        visited: &mut FxHashSet<CityId>,
    ) -> Result<usize, MapError> {
        let city = self.graph.check(city)?;
        Ok(self.spread_from(city, color, visited))
    }

    fn spread_from(&mut self, city: CityId, color: Color, visited: &mut FxHashSet<CityId>) -> usize {
        let mut pending = vec![city];
        let mut count = 0;

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            count += 1;
            self.outbreaks = self.outbreaks.saturating_add(1);
            log::debug!(
                "outbreak of {} in {} ({} total)",
                color,
                self.graph.name(current),
                self.outbreaks
            );
            if self.outbreaks >= self.config.outbreak_limit {
                self.lose(LossCause::OutbreakLimit);
            }

            let neighbors: SmallVec<[CityId; 6]> = self.graph.neighbors(current).into();
            for neighbor in neighbors {
                if visited.contains(&neighbor) {
                    continue;
                }
                if self.place_markers(neighbor, color, 1).overflowed {
                    pending.push(neighbor);
                }
            }
        }
        count
    }

    /// Remove up to `amount` markers of `color` from `city`, returning the
    /// cubes to the supply. Returns how many were removed.
    pub fn treat(&mut self, city: CityId, color: Color, amount: u8) -> Result<u8, MapError> {
        let city = self.graph.check(city)?;
        Ok(self.remove_markers(city, color, amount))
    }

    pub(crate) fn remove_markers(&mut self, city: CityId, color: Color, amount: u8) -> u8 {
        let c = color.index();
        let removed = self.cities[city.index()].markers[c].min(amount);
        self.cities[city.index()].markers[c] -= removed;
        self.cubes[c] += removed;
        removed
    }

    /// Clear cured colors from the city of every treat-all role.
    pub(crate) fn sweep_cured(&mut self) {
        let sweepers: SmallVec<[CityId; 4]> = self
            .players
            .iter()
            .filter(|p| p.capabilities().treats_all)
            .map(|p| p.city())
            .collect();
        for city in sweepers {
            for color in Color::ALL {
                if self.is_cured(color) {
                    self.remove_markers(city, color, MAX_MARKERS);
                }
            }
        }
    }
}
