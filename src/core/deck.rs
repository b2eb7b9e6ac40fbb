//! Ordered card piles backed by persistent vectors.
//!
//! The front of the vector is the top of the pile. `im::Vector` gives O(1)
//! clones and cheap operations at both ends, which is what draw piles
//! (top draws, bottom draws for epidemics) and restacking need.

use std::ops::Range;

use im::Vector;

use super::GameRng;

/// An ordered pile of cards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deck<T: Clone> {
    cards: Vector<T>,
}

impl<T: Clone> Default for Deck<T> {
    fn default() -> Self {
        Self { cards: Vector::new() }
    }
}

impl<T: Clone> FromIterator<T> for Deck<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { cards: iter.into_iter().collect() }
    }
}

impl<T: Clone> Deck<T> {
    /// Create an empty pile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a player deck with one epidemic card seeded into each segment.
    ///
    /// `cards` is split into `epidemics.len()` nearly equal contiguous chunks
    /// (earlier chunks take the remainder), each chunk receives one epidemic
    /// card and is shuffled on its own, then the chunks are stacked in order.
    pub fn with_epidemics(cards: Vec<T>, epidemics: Vec<T>, rng: &mut GameRng) -> Self {
        if epidemics.is_empty() {
            return cards.into_iter().collect();
        }

        let mut built = Vector::new();
        for (range, epidemic) in segment_bounds(cards.len(), epidemics.len())
            .into_iter()
            .zip(epidemics)
        {
            let mut chunk = cards[range].to_vec();
            chunk.push(epidemic);
            rng.shuffle(&mut chunk);
            built.extend(chunk);
        }
        Self { cards: built }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle the whole pile.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<T> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into();
    }

    /// Draw the top card.
    pub fn draw(&mut self) -> Option<T> {
        self.cards.pop_front()
    }

    /// Draw the bottom card.
    pub fn draw_bottom(&mut self) -> Option<T> {
        self.cards.pop_back()
    }

    /// Put a card on top of the pile.
    pub fn discard(&mut self, card: T) {
        self.cards.push_front(card);
    }

    /// Stack another pile on top of this one, keeping its order.
    pub fn place_on_top(&mut self, mut other: Deck<T>) {
        other.cards.append(std::mem::take(&mut self.cards));
        self.cards = other.cards;
    }

    /// Remove every card, returning them as a pile.
    pub fn take_all(&mut self) -> Deck<T> {
        std::mem::take(self)
    }

    /// Look at the top `n` cards without drawing them.
    pub fn peek(&self, n: usize) -> impl Iterator<Item = &T> {
        self.cards.iter().take(n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cards.iter()
    }
}

impl<T: Clone + PartialEq> Deck<T> {
    #[must_use]
    pub fn contains(&self, card: &T) -> bool {
        self.cards.iter().any(|c| c == card)
    }

    /// Remove the first occurrence of `card`. Returns whether it was present.
    pub fn remove(&mut self, card: &T) -> bool {
        match self.cards.iter().position(|c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the top cards with `order`.
    ///
    /// `order` must be a permutation of the current top `order.len()` cards;
    /// returns `false` and leaves the pile untouched otherwise.
    pub fn reorder_top(&mut self, order: &[T]) -> bool {
        if order.len() > self.cards.len() {
            return false;
        }
        let mut top: Vec<T> = self.cards.iter().take(order.len()).cloned().collect();
        for card in order {
            match top.iter().position(|c| c == card) {
                Some(index) => {
                    top.swap_remove(index);
                }
                None => return false,
            }
        }

        let rest = self.cards.split_off(order.len());
        self.cards = order.iter().cloned().collect();
        self.cards.append(rest);
        true
    }
}

/// Split `len` items into `parts` contiguous ranges whose sizes differ by at
/// most one, larger ranges first.
#[must_use]
pub fn segment_bounds(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let extra = len % parts;
    let mut start = 0;
    (0..parts)
        .map(|i| {
            let size = base + usize::from(i < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Ranges of a deck built by [`Deck::with_epidemics`] that each hold exactly
/// one epidemic card.
#[must_use]
pub fn epidemic_segments(card_count: usize, epidemics: usize) -> Vec<Range<usize>> {
    segment_bounds(card_count, epidemics)
        .into_iter()
        .enumerate()
        .map(|(i, range)| range.start + i..range.end + i + 1)
        .collect()
}
