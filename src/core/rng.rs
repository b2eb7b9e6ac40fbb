//! Seeded random streams for setup, rollouts and search sub-runs.
//!
//! Game setup draws its shuffles from separate context streams (player deck,
//! infection deck, role draft), so changing how one deck is built never
//! perturbs another. Searches `fork` a fresh stream per sub-run.
//!
//! ```
//! use pandemic_sim::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//! let sub = rng.fork();
//! assert_ne!(rng, sub);
//!
//! let mut replay = GameRng::new(42);
//! assert_eq!(replay.fork(), sub);
//! assert_eq!(replay.gen_range_usize(0..1000), rng.gen_range_usize(0..1000));
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// ChaCha8 stream that remembers its seed, so it can derive children.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    forks: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed), seed, forks: 0 }
    }

    /// Derive the next child stream. The n-th fork of a seed is always the
    /// same stream, and forking never advances `self`'s own sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.forks += 1;
        Self::new(self.seed.wrapping_add(self.forks.wrapping_mul(0x9E37_79B9_7F4A_7C15)))
    }

    /// Stream keyed by a name, independent of how many forks were taken.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = rustc_hash::FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// `amount` distinct elements, in random order.
    pub fn sample<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items.choose_multiple(&mut self.inner, amount).cloned().collect()
    }

    /// Seed, position in the stream and fork count.
    fn position(&self) -> (u64, u128, u64) {
        (self.seed, self.inner.get_word_pos(), self.forks)
    }
}

/// Two streams are equal when they will produce the same numbers and forks.
impl PartialEq for GameRng {
    fn eq(&self, other: &Self) -> bool {
        self.position() == other.position()
    }
}

impl Eq for GameRng {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(a.gen_range_usize(0..1000), b.gen_range_usize(0..1000));
        }
        assert_eq!(a, b);
        a.gen_range_usize(0..1000);
        assert_ne!(a, b);
    }

    #[test]
    fn test_forks() {
        let mut rng = GameRng::new(42);
        let mut first = rng.fork();
        let mut second = rng.fork();
        assert_ne!(first, second);

        let mut replay = GameRng::new(42);
        assert_eq!(replay.fork(), first);
        assert_eq!(replay.fork(), second);

        let seq1: Vec<_> = (0..10).map(|_| first.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| second.gen_range_usize(0..1000)).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut deck = rng.for_context("player-deck");
        let mut infection = rng.for_context("infection-deck");

        let seq1: Vec<_> = (0..10).map(|_| deck.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| infection.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
        assert_eq!(rng.for_context("player-deck"), rng.for_context("player-deck"));
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<u32> = (1..=10).collect();
        let original = data.clone();

        rng.shuffle(&mut data);
        assert_ne!(data, original);

        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_sample_is_distinct() {
        let mut rng = GameRng::new(7);
        let items: Vec<u8> = (0..7).collect();
        let mut picked = rng.sample(&items, 4);
        assert_eq!(picked.len(), 4);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 4);
    }
}
