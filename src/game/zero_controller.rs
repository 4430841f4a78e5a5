//! Zero controller for testing and automation
//!
//! This controller always chooses the first option (or the empty subset).
//! It's useful for automated testing and ensuring games can complete
//! without user input.

use crate::core::PlayerId;
use crate::game::controller::{Constraint, DecisionProvider, DecisionRequest, GameStateView, Selection};

/// A controller that always chooses option 0
///
/// This is useful for:
/// - Automated testing
/// - Running games without interaction
/// - Benchmarking the engine
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl DecisionProvider for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn request_choice(&mut self, _view: &GameStateView, request: &DecisionRequest) -> Selection {
        match request.constraint {
            Constraint::ExactlyOne => Selection::One(0),
            Constraint::AnySubset => Selection::none(),
        }
    }
}
