//! Game events and the event sink
//!
//! State mutations record events in the game's outbox; the round manager
//! drains the outbox into whatever [`EventSink`] the game was started with.
//! Nothing in the engine depends on what a sink does with them.

use crate::core::{AbilityKind, CardId, DamageCategory, DamageSource, PlayerId};
use crate::game::combat::AttackKind;
use crate::game::controller::PromptKind;
use crate::game::phase::Phase;
use crate::game::round::GameEndReason;
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum GameEvent {
    GameStarted {
        first_player: PlayerId,
        seed: Option<u64>,
    },
    RoundStarted {
        round: u32,
        first_player: PlayerId,
    },
    PhaseEntered {
        round: u32,
        phase: Phase,
    },
    PhaseExited {
        round: u32,
        phase: Phase,
    },
    CardDrawn {
        player: PlayerId,
        card: CardId,
    },
    DeckEmpty {
        player: PlayerId,
    },
    FirstTokenPassed {
        from: PlayerId,
        to: PlayerId,
    },
    CardCommitted {
        player: PlayerId,
        card: CardId,
    },
    TokenPlaced {
        player: PlayerId,
    },
    CardRevealed {
        card: CardId,
    },
    /// Card arrived in a zone from outside the zone set (deck or ASP)
    CardPlaced {
        player: PlayerId,
        card: CardId,
        zone: Zone,
    },
    CardMoved {
        card: CardId,
        from: Zone,
        to: Zone,
    },
    WallOverflow {
        player: PlayerId,
        card: CardId,
    },
    DamageApplied {
        card: CardId,
        amount: u32,
        category: DamageCategory,
        remaining: u32,
    },
    DamageIgnored {
        card: CardId,
        category: DamageCategory,
    },
    CardDestroyed {
        card: CardId,
    },
    ActionPointSpent {
        card: CardId,
        remaining: u32,
    },
    AttackDeclared {
        attacker: CardId,
        kind: AttackKind,
        target: CardId,
    },
    AttackBlocked {
        attacker: CardId,
        blocker: CardId,
    },
    TrapTriggered {
        trap: CardId,
        attacker: CardId,
    },
    TrapBypassed {
        trap: CardId,
        blocker: CardId,
    },
    AbilityResolved {
        card: CardId,
        ability: AbilityKind,
    },
    AbilityFizzled {
        card: CardId,
        ability: Option<AbilityKind>,
        reason: String,
    },
    DamageSourceConsumed {
        attacker: CardId,
        resource: CardId,
        source: DamageSource,
    },
    RangedAttackPrevented {
        attacker: CardId,
        source: Option<DamageSource>,
    },
    SelectionRejected {
        player: PlayerId,
        kind: PromptKind,
    },
    RoundEnded {
        round: u32,
    },
    GameEnded {
        winner: Option<PlayerId>,
        scores: Vec<(PlayerId, u32)>,
        reason: GameEndReason,
    },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::GameStarted { first_player, seed } => match seed {
                Some(seed) => write!(f, "Game started (seed {seed}), player {first_player} holds the token"),
                None => write!(f, "Game started, player {first_player} holds the token"),
            },
            GameEvent::RoundStarted { round, first_player } => {
                write!(f, "=== Round {round} (first player {first_player}) ===")
            }
            GameEvent::PhaseEntered { phase, .. } => write!(f, "--- {phase} ---"),
            GameEvent::PhaseExited { phase, .. } => write!(f, "end of {phase}"),
            GameEvent::CardDrawn { player, card } => write!(f, "player {player} draws card {card}"),
            GameEvent::DeckEmpty { player } => write!(f, "player {player}'s deck is empty"),
            GameEvent::FirstTokenPassed { from, to } => {
                write!(f, "player {from} passes the first player token to player {to}")
            }
            GameEvent::CardCommitted { player, card } => {
                write!(f, "player {player} commits card {card} to the ASP")
            }
            GameEvent::TokenPlaced { player } => {
                write!(f, "player {player} places the first player token")
            }
            GameEvent::CardRevealed { card } => write!(f, "card {card} is revealed"),
            GameEvent::CardPlaced { player, card, zone } => {
                write!(f, "card {card} placed in player {player}'s {zone}")
            }
            GameEvent::CardMoved { card, from, to } => write!(f, "card {card} moves {from} -> {to}"),
            GameEvent::WallOverflow { player, card } => {
                write!(f, "player {player}'s wall is full, card {card} goes to Discard")
            }
            GameEvent::DamageApplied {
                card,
                amount,
                category,
                remaining,
            } => write!(
                f,
                "card {card} takes {amount} {category:?} damage ({remaining} left)"
            ),
            GameEvent::DamageIgnored { card, category } => {
                write!(f, "card {card} ignores {category:?} damage")
            }
            GameEvent::CardDestroyed { card } => write!(f, "card {card} is destroyed"),
            GameEvent::ActionPointSpent { card, remaining } => {
                write!(f, "card {card} spends an action point ({remaining} left)")
            }
            GameEvent::AttackDeclared {
                attacker,
                kind,
                target,
            } => write!(f, "card {attacker} makes a {kind:?} attack on card {target}"),
            GameEvent::AttackBlocked { attacker, blocker } => {
                write!(f, "attack by card {attacker} blocked with card {blocker}")
            }
            GameEvent::TrapTriggered { trap, attacker } => {
                write!(f, "trap {trap} springs on card {attacker}")
            }
            GameEvent::TrapBypassed { trap, blocker } => {
                write!(f, "trap {trap} bypassed with card {blocker}")
            }
            GameEvent::AbilityResolved { card, ability } => {
                write!(f, "card {card} resolves {ability}")
            }
            GameEvent::AbilityFizzled { card, reason, .. } => {
                write!(f, "ability of card {card} fizzles: {reason}")
            }
            GameEvent::DamageSourceConsumed {
                attacker,
                resource,
                source,
            } => write!(f, "card {attacker} uses card {resource} as {source}"),
            GameEvent::RangedAttackPrevented { attacker, source } => match source {
                Some(source) => write!(f, "card {attacker} has no {source} in hand and cannot fire"),
                None => write!(f, "card {attacker} has no damage source and cannot fire"),
            },
            GameEvent::SelectionRejected { player, kind } => {
                write!(f, "invalid {kind:?} selection from player {player}, asking again")
            }
            GameEvent::RoundEnded { round } => write!(f, "round {round} complete"),
            GameEvent::GameEnded {
                winner,
                scores,
                reason,
            } => {
                match winner {
                    Some(winner) => write!(f, "Game over: player {winner} wins ({reason:?})")?,
                    None => write!(f, "Game over: draw ({reason:?})")?,
                }
                for (player, score) in scores {
                    write!(f, " [player {player}: {score}]")?;
                }
                Ok(())
            }
        }
    }
}

/// Receiver of game events
pub trait EventSink {
    fn emit(&mut self, event: &GameEvent);
}

/// Sink that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &GameEvent) {}
}

/// Recording sink: keeps every event in order
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: &GameEvent) {
        self.push(event.clone());
    }
}
