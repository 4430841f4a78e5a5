//! Game configuration

use crate::zones::WALL_CAPACITY;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub wall_capacity: usize,
    /// Cards dealt face-down to each wall before round 1
    pub initial_wall: usize,
    /// Cards dealt to each hand before round 1
    pub initial_hand: usize,
    /// Stop the game after this many rounds even if no end condition fired
    pub max_rounds: u32,
    /// Seed for deck shuffles; None means entropy
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            wall_capacity: WALL_CAPACITY,
            initial_wall: 10,
            initial_hand: 10,
            max_rounds: 500,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }
}
