//! Random controller for testing and baseline gameplay
//!
//! Makes uniformly random choices. Seed it for reproducible games.

use crate::core::PlayerId;
use crate::game::controller::{Constraint, DecisionProvider, DecisionRequest, GameStateView, Selection};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use smallvec::SmallVec;

/// A controller that makes random choices
pub struct RandomController {
    player_id: PlayerId,
    rng: ChaCha12Rng,
}

impl RandomController {
    /// Create a new random controller seeded from entropy
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Create a random controller with a seeded RNG (for deterministic testing)
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionProvider for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn request_choice(&mut self, _view: &GameStateView, request: &DecisionRequest) -> Selection {
        match request.constraint {
            Constraint::ExactlyOne => Selection::One(self.rng.gen_range(0..request.options.len().max(1))),
            Constraint::AnySubset => {
                // Each option independently, with even odds
                let picked: SmallVec<[usize; 8]> = (0..request.options.len())
                    .filter(|_| self.rng.gen_bool(0.5))
                    .collect();
                Selection::Many(picked)
            }
        }
    }
}
