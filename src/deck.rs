//! Per-player draw pile and shuffle providers

use crate::core::{CardId, PlayerId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Produces a permutation of a card sequence
///
/// The engine only needs "uniformly shuffled"; swap in a seeded or
/// identity provider to make games reproducible.
pub trait ShuffleProvider {
    fn shuffle(&mut self, cards: &mut [CardId]);
}

/// Shuffle backed by a seeded ChaCha12 generator
#[derive(Debug, Clone)]
pub struct SeededShuffle {
    rng: ChaCha12Rng,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        SeededShuffle {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy (non-reproducible games)
    pub fn from_entropy() -> Self {
        SeededShuffle {
            rng: ChaCha12Rng::from_entropy(),
        }
    }
}

impl ShuffleProvider for SeededShuffle {
    fn shuffle(&mut self, cards: &mut [CardId]) {
        cards.shuffle(&mut self.rng);
    }
}

/// Leaves the order untouched; the last card built is drawn first
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityShuffle;

impl ShuffleProvider for IdentityShuffle {
    fn shuffle(&mut self, _cards: &mut [CardId]) {}
}

/// A player's draw pile, used as a stack (draw from the end)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub owner: PlayerId,
    cards: Vec<CardId>,
}

impl Deck {
    /// Build a deck and shuffle it; this is the only shuffle it ever sees
    pub fn new(owner: PlayerId, mut cards: Vec<CardId>, shuffler: &mut dyn ShuffleProvider) -> Self {
        shuffler.shuffle(&mut cards);
        Deck { owner, cards }
    }

    /// Remove the top card, or None when the deck is exhausted
    pub fn draw(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    /// Stack a card so it is the next one drawn
    pub fn put_on_top(&mut self, card: CardId) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Pull a specific card out of the pile; false if it is not here
    pub fn remove(&mut self, card_id: CardId) -> bool {
        match self.cards.iter().position(|&c| c == card_id) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }
}
