//! Player zones (Hand, Wall, Battlement, Field, Discard)

use crate::core::{Card, CardId, EntityStore, PlayerId};
use crate::error::Precondition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of face-down cards a wall can hold
pub const WALL_CAPACITY: usize = 14;

/// Different zones where a player's cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    Wall,
    Battlement,
    Field,
    Discard,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::Hand,
        Zone::Wall,
        Zone::Battlement,
        Zone::Field,
        Zone::Discard,
    ];

    /// Zones where characters are in play
    pub fn is_in_play(&self) -> bool {
        matches!(self, Zone::Battlement | Zone::Field)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::Hand => "Hand",
            Zone::Wall => "Wall",
            Zone::Battlement => "Battlement",
            Zone::Field => "Field",
            Zone::Discard => "Discard",
        };
        f.write_str(name)
    }
}

/// A zone containing cards
///
/// Order is kept for every zone: the wall is a stack, and the others keep
/// insertion order so that option lists handed to controllers are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,
    pub owner: PlayerId,
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // remove() rather than swap_remove(): option order must stay deterministic
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Collection of all zones for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub hand: CardZone,
    pub wall: CardZone,
    pub battlement: CardZone,
    pub field: CardZone,
    pub discard: CardZone,
    wall_capacity: usize,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        Self::with_wall_capacity(player_id, WALL_CAPACITY)
    }

    pub fn with_wall_capacity(player_id: PlayerId, wall_capacity: usize) -> Self {
        PlayerZones {
            hand: CardZone::new(Zone::Hand, player_id),
            wall: CardZone::new(Zone::Wall, player_id),
            battlement: CardZone::new(Zone::Battlement, player_id),
            field: CardZone::new(Zone::Field, player_id),
            discard: CardZone::new(Zone::Discard, player_id),
            wall_capacity,
        }
    }

    pub fn get_zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Hand => &self.hand,
            Zone::Wall => &self.wall,
            Zone::Battlement => &self.battlement,
            Zone::Field => &self.field,
            Zone::Discard => &self.discard,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Hand => &mut self.hand,
            Zone::Wall => &mut self.wall,
            Zone::Battlement => &mut self.battlement,
            Zone::Field => &mut self.field,
            Zone::Discard => &mut self.discard,
        }
    }

    pub fn wall_is_full(&self) -> bool {
        self.wall.len() >= self.wall_capacity
    }

    /// Which zone currently holds the card, if any
    pub fn locate(&self, card_id: CardId) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|&zone| self.get_zone(zone).contains(card_id))
    }

    /// Place a card arriving from outside the zone set (deck, ASP)
    ///
    /// A full wall routes the card to Discard; the returned zone says where
    /// it actually landed.
    pub fn add(&mut self, card_id: CardId, to: Zone) -> Zone {
        let to = if to == Zone::Wall && self.wall_is_full() {
            Zone::Discard
        } else {
            to
        };
        self.get_zone_mut(to).add(card_id);
        to
    }

    /// Move a card between two of this player's zones
    pub fn move_card(&mut self, card_id: CardId, from: Zone, to: Zone) -> Result<Zone, Precondition> {
        if !self.get_zone(from).contains(card_id) {
            return Err(Precondition::NotInZone {
                card: card_id,
                zone: from,
            });
        }
        self.get_zone_mut(from).remove(card_id);
        Ok(self.add(card_id, to))
    }

    /// Remove the card from whichever zone holds it and append to Discard
    ///
    /// Returns false (and changes nothing) when the card is already
    /// discarded, so double-trigger paths are harmless. A card in no zone
    /// must already have left the deck and the ASP.
    pub fn destroy(&mut self, card_id: CardId) -> bool {
        match self.locate(card_id) {
            Some(Zone::Discard) => false,
            Some(zone) => {
                self.get_zone_mut(zone).remove(card_id);
                self.discard.add(card_id);
                true
            }
            None => {
                self.discard.add(card_id);
                true
            }
        }
    }

    /// Characters in play, battlement first
    pub fn characters_in_play(&self) -> impl Iterator<Item = CardId> + '_ {
        self.battlement
            .cards
            .iter()
            .chain(self.field.cards.iter())
            .copied()
    }

    pub fn unused_action_points(&self, cards: &EntityStore<Card>) -> u32 {
        self.characters_in_play()
            .filter_map(|id| cards.get(id).ok())
            .map(|card| card.action_points)
            .sum()
    }

    pub fn has_character_anywhere(&self, cards: &EntityStore<Card>) -> bool {
        self.characters_in_play()
            .filter_map(|id| cards.get(id).ok())
            .any(Card::is_character)
    }

    pub fn total_cards(&self) -> usize {
        Zone::ALL.iter().map(|&z| self.get_zone(z).len()).sum()
    }

    /// Every card id held by any zone, in zone order
    pub fn all_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        Zone::ALL
            .into_iter()
            .flat_map(move |z| self.get_zone(z).cards.iter().copied())
    }
}
