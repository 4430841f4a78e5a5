//! Action Sequence Pile
//!
//! Cards committed face-down during ASP placement wait here until the
//! resolution phase pops them, last placed first.

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspEntry {
    pub player: PlayerId,
    pub card: CardId,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionSequencePile {
    entries: Vec<AspEntry>,
}

impl ActionSequencePile {
    pub fn new() -> Self {
        ActionSequencePile {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, player: PlayerId, card: CardId) {
        self.entries.push(AspEntry { player, card });
    }

    /// Take the most recently placed entry
    pub fn pop(&mut self) -> Option<AspEntry> {
        self.entries.pop()
    }

    /// Take a card off the pile wherever it sits, keeping the others in order
    pub fn remove(&mut self, card: CardId) -> Option<AspEntry> {
        let pos = self.entries.iter().position(|e| e.card == card)?;
        Some(self.entries.remove(pos))
    }

    /// Cards a player has in flight
    pub fn cards_of(&self, player: PlayerId) -> impl Iterator<Item = CardId> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.player == player)
            .map(|e| e.card)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in placement order (bottom of the pile first)
    pub fn entries(&self) -> &[AspEntry] {
        &self.entries
    }
}
