//! Round phases

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phases of a round, in their fixed cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    AspPlacement,
    AspResolution,
    Movement,
    Melee,
    Ranged,
    Refortify,
    Cleanup,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Draw,
        Phase::AspPlacement,
        Phase::AspResolution,
        Phase::Movement,
        Phase::Melee,
        Phase::Ranged,
        Phase::Refortify,
        Phase::Cleanup,
    ];

    /// Get the next phase in round order
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Draw => Some(Phase::AspPlacement),
            Phase::AspPlacement => Some(Phase::AspResolution),
            Phase::AspResolution => Some(Phase::Movement),
            Phase::Movement => Some(Phase::Melee),
            Phase::Melee => Some(Phase::Ranged),
            Phase::Ranged => Some(Phase::Refortify),
            Phase::Refortify => Some(Phase::Cleanup),
            Phase::Cleanup => None, // End of round
        }
    }

    /// Phases in which characters act and spend action points
    pub fn is_combat(&self) -> bool {
        matches!(self, Phase::Melee | Phase::Ranged)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Draw => "Draw",
            Phase::AspPlacement => "ASP Placement",
            Phase::AspResolution => "ASP Resolution",
            Phase::Movement => "Movement",
            Phase::Melee => "Melee",
            Phase::Ranged => "Ranged",
            Phase::Refortify => "Refortify",
            Phase::Cleanup => "Cleanup",
        };
        f.write_str(name)
    }
}

/// Where the game is in its round cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStructure {
    /// Current round number (0 before the first round starts)
    pub round_number: u32,

    pub current_phase: Phase,

    /// Holder of the first-player token; acts first in every phase
    pub first_player: PlayerId,
}

impl RoundStructure {
    pub fn new(first_player: PlayerId) -> Self {
        RoundStructure {
            round_number: 0,
            current_phase: Phase::Draw,
            first_player,
        }
    }

    /// Begin the next round at the Draw phase
    pub fn start_round(&mut self) {
        self.round_number += 1;
        self.current_phase = Phase::Draw;
    }

    /// Advance to the next phase; returns false after Cleanup
    pub fn advance_phase(&mut self) -> bool {
        if let Some(next) = self.current_phase.next() {
            self.current_phase = next;
            true
        } else {
            false
        }
    }
}
