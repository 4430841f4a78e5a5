//! Player representation

use crate::core::{EntityId, GameEntity, PlayerName};
use serde::{Deserialize, Serialize};

pub type PlayerId = EntityId<Player>;

/// A seat at the table
///
/// Zones and decks are owned by the game state and indexed by seat, so a
/// player is just an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: PlayerName,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        Player {
            id,
            name: name.into(),
        }
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> String {
        self.name.to_string()
    }
}
