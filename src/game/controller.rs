//! Decision provider trait and game state view
//!
//! This module defines the interface between the rules engine and whoever
//! makes the players' choices (AI, scripted test harness or a human). The
//! engine issues a typed [`DecisionRequest`] at every choice point, and the
//! provider inspects a read-only [`GameStateView`] to answer it. Answers
//! that break the request's constraint are rejected and asked again.

use crate::core::{CardId, PlayerId};
use crate::game::events::{EventSink, GameEvent};
use crate::game::phase::Phase;
use crate::game::GameState;
use crate::zones::Zone;
use crate::{RampartError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What a decision is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromptKind {
    DrawCard,
    PassFirstToken,
    AspPlacement,
    AspResolution,
    TrapResolution,
    CharacterPlacement,
    MoveToField,
    MeleeAttacker,
    RangedAttacker,
    AttackTarget,
    BlockCard,
    TrapBlock,
    DamageSource,
    JokerBonusZone,
    JokerBonusSpend,
    JokerDamageTarget,
    AbilityTarget,
    DrawTwoTarget,
    RefortifyAction,
    RefortifyCard,
    RefortifyPayer,
}

/// Shape of an acceptable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// A single index in `[0, options.len())`
    ExactlyOne,
    /// Any set of distinct indices, including none
    AnySubset,
}

/// One entry of a decision's option list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceOption {
    Card(CardId),
    Zone(Zone),
    Player(PlayerId),
    Yes,
    No,
    Pass,
    PlaceToken,
    Reveal,
    Discard,
    PlaceInWall,
    SetTrap,
    DrawWithTen,
    ResetTrap,
}

impl ChoiceOption {
    pub fn card(&self) -> Option<CardId> {
        match self {
            ChoiceOption::Card(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub player: PlayerId,
    pub kind: PromptKind,
    pub constraint: Constraint,
    pub options: Vec<ChoiceOption>,
}

impl DecisionRequest {
    pub fn one(player: PlayerId, kind: PromptKind, options: Vec<ChoiceOption>) -> Self {
        DecisionRequest {
            player,
            kind,
            constraint: Constraint::ExactlyOne,
            options,
        }
    }

    pub fn subset(player: PlayerId, kind: PromptKind, options: Vec<ChoiceOption>) -> Self {
        DecisionRequest {
            player,
            kind,
            constraint: Constraint::AnySubset,
            options,
        }
    }

    /// Does the selection satisfy this request's constraint?
    pub fn accepts(&self, selection: &Selection) -> bool {
        let len = self.options.len();
        match (self.constraint, selection) {
            (Constraint::ExactlyOne, Selection::One(idx)) => *idx < len,
            (Constraint::AnySubset, Selection::Many(indices)) => indices
                .iter()
                .enumerate()
                .all(|(pos, idx)| *idx < len && !indices[..pos].contains(idx)),
            _ => false,
        }
    }
}

/// A provider's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    One(usize),
    Many(SmallVec<[usize; 8]>),
}

impl Selection {
    pub fn none() -> Self {
        Selection::Many(SmallVec::new())
    }
}

/// Read-only view of game state for decision providers
///
/// Face-down cards are hidden from players who should not see them.
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    /// Create a new view of the game state from a player's perspective
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    /// Get the player ID this view is for
    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn opponent_id(&self) -> PlayerId {
        self.game.opponent(self.player_id)
    }

    pub fn round_number(&self) -> u32 {
        self.game.round.round_number
    }

    pub fn phase(&self) -> Phase {
        self.game.round.current_phase
    }

    pub fn first_player(&self) -> PlayerId {
        self.game.first_player()
    }

    fn zone_of(&self, player: PlayerId, zone: Zone) -> &'a [CardId] {
        self.game
            .zones(player)
            .map(|zones| zones.get_zone(zone).cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn hand(&self) -> &'a [CardId] {
        self.zone_of(self.player_id, Zone::Hand)
    }

    pub fn battlement(&self) -> &'a [CardId] {
        self.zone_of(self.player_id, Zone::Battlement)
    }

    pub fn field(&self) -> &'a [CardId] {
        self.zone_of(self.player_id, Zone::Field)
    }

    pub fn discard(&self) -> &'a [CardId] {
        self.zone_of(self.player_id, Zone::Discard)
    }

    pub fn wall_size(&self) -> usize {
        self.zone_of(self.player_id, Zone::Wall).len()
    }

    pub fn opponent_battlement(&self) -> &'a [CardId] {
        self.zone_of(self.opponent_id(), Zone::Battlement)
    }

    pub fn opponent_field(&self) -> &'a [CardId] {
        self.zone_of(self.opponent_id(), Zone::Field)
    }

    pub fn opponent_wall_size(&self) -> usize {
        self.zone_of(self.opponent_id(), Zone::Wall).len()
    }

    pub fn opponent_hand_size(&self) -> usize {
        self.zone_of(self.opponent_id(), Zone::Hand).len()
    }

    pub fn deck_size(&self) -> usize {
        self.game.deck_len(self.player_id)
    }

    pub fn score(&self, player: PlayerId) -> u32 {
        self.game.score(player).unwrap_or(0)
    }

    /// Can this player see the card's face?
    pub fn is_visible(&self, card_id: CardId) -> bool {
        match self.game.card(card_id) {
            Ok(card) => {
                !card.face_down
                    || (card.owner == self.player_id && self.game.locate(card_id) != Some(Zone::Wall))
            }
            Err(_) => false,
        }
    }

    /// Card name, or a placeholder for a hidden card
    pub fn card_name(&self, card_id: CardId) -> Option<String> {
        let card = self.game.card(card_id).ok()?;
        if self.is_visible(card_id) {
            Some(card.definition.identity.to_string())
        } else {
            Some("Face-down card".to_string())
        }
    }

    pub fn action_points(&self, card_id: CardId) -> u32 {
        self.game.card(card_id).map(|c| c.action_points).unwrap_or(0)
    }

    pub fn damage_points(&self, card_id: CardId) -> u32 {
        self.game.card(card_id).map(|c| c.damage_points).unwrap_or(0)
    }

    /// Human-readable label for an option
    pub fn describe_option(&self, option: &ChoiceOption) -> String {
        match option {
            ChoiceOption::Card(id) => {
                let name = self.card_name(*id).unwrap_or_else(|| format!("card {id}"));
                match self.game.card(*id) {
                    Ok(card) if card.is_character() && self.is_visible(*id) => format!(
                        "{name} (DP {}, AP {})",
                        card.damage_points, card.action_points
                    ),
                    _ => name,
                }
            }
            ChoiceOption::Zone(zone) => zone.to_string(),
            ChoiceOption::Player(id) if *id == self.player_id => "yourself".to_string(),
            ChoiceOption::Player(_) => "your opponent".to_string(),
            ChoiceOption::Yes => "yes".to_string(),
            ChoiceOption::No => "no".to_string(),
            ChoiceOption::Pass => "pass".to_string(),
            ChoiceOption::PlaceToken => "place the first player token".to_string(),
            ChoiceOption::Reveal => "reveal".to_string(),
            ChoiceOption::Discard => "discard".to_string(),
            ChoiceOption::PlaceInWall => "place in wall".to_string(),
            ChoiceOption::SetTrap => "set trap in wall".to_string(),
            ChoiceOption::DrawWithTen => "discard a Ten to draw".to_string(),
            ChoiceOption::ResetTrap => "reset a trap from discard".to_string(),
        }
    }
}

/// Decision provider trait
///
/// Implement this trait to create AI players or connect to a UI. The
/// engine calls `request_choice` at every suspension point and blocks
/// until an answer satisfying the request's constraint comes back.
pub trait DecisionProvider {
    /// Get the player ID this provider decides for
    fn player_id(&self) -> PlayerId;

    fn request_choice(&mut self, view: &GameStateView, request: &DecisionRequest) -> Selection;

    /// Called when the game ends (for cleanup/logging)
    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}

/// The two decision providers and the event sink a game is played with
pub struct Seats<'a> {
    providers: [&'a mut dyn DecisionProvider; 2],
    sink: &'a mut dyn EventSink,
}

impl<'a> Seats<'a> {
    pub fn new(
        provider1: &'a mut dyn DecisionProvider,
        provider2: &'a mut dyn DecisionProvider,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Seats {
            providers: [provider1, provider2],
            sink,
        }
    }

    pub fn player_ids(&self) -> [PlayerId; 2] {
        [self.providers[0].player_id(), self.providers[1].player_id()]
    }

    fn seat_of(&self, player: PlayerId) -> Result<usize> {
        self.providers
            .iter()
            .position(|p| p.player_id() == player)
            .ok_or(RampartError::EntityNotFound(player.as_u32()))
    }

    /// Deliver pending events to the sink
    pub fn flush(&mut self, game: &mut GameState) {
        for event in game.drain_events() {
            self.sink.emit(&event);
        }
    }

    /// Ask until the provider gives an answer the request accepts
    pub fn request(&mut self, game: &mut GameState, request: &DecisionRequest) -> Result<Selection> {
        if request.options.is_empty() && request.constraint == Constraint::ExactlyOne {
            return Err(RampartError::InvariantViolation(format!(
                "{:?} decision offered with no options",
                request.kind
            )));
        }
        let seat = self.seat_of(request.player)?;
        loop {
            self.flush(game);
            let selection = {
                let view = GameStateView::new(game, request.player);
                self.providers[seat].request_choice(&view, request)
            };
            if request.accepts(&selection) {
                return Ok(selection);
            }
            game.emit(GameEvent::SelectionRejected {
                player: request.player,
                kind: request.kind,
            });
        }
    }

    /// Pick exactly one option and return it
    pub fn choose(
        &mut self,
        game: &mut GameState,
        player: PlayerId,
        kind: PromptKind,
        options: Vec<ChoiceOption>,
    ) -> Result<ChoiceOption> {
        let request = DecisionRequest::one(player, kind, options);
        match self.request(game, &request)? {
            Selection::One(idx) => Ok(request.options[idx]),
            Selection::Many(_) => Err(mismatched(kind)),
        }
    }

    /// Pick one card from a non-empty list
    pub fn choose_card(
        &mut self,
        game: &mut GameState,
        player: PlayerId,
        kind: PromptKind,
        cards: &[CardId],
    ) -> Result<CardId> {
        let options = cards.iter().copied().map(ChoiceOption::Card).collect();
        let chosen = self.choose(game, player, kind, options)?;
        chosen
            .card()
            .ok_or_else(|| RampartError::InvariantViolation(format!("{kind:?} answer is not a card")))
    }

    /// Pick a card or pass; None means pass
    pub fn choose_card_or_pass(
        &mut self,
        game: &mut GameState,
        player: PlayerId,
        kind: PromptKind,
        cards: &[CardId],
    ) -> Result<Option<CardId>> {
        let mut options: Vec<ChoiceOption> = cards.iter().copied().map(ChoiceOption::Card).collect();
        options.push(ChoiceOption::Pass);
        Ok(self.choose(game, player, kind, options)?.card())
    }

    /// Pick any subset of the options
    pub fn choose_subset(
        &mut self,
        game: &mut GameState,
        player: PlayerId,
        kind: PromptKind,
        options: Vec<ChoiceOption>,
    ) -> Result<Vec<ChoiceOption>> {
        let request = DecisionRequest::subset(player, kind, options);
        match self.request(game, &request)? {
            Selection::Many(indices) => Ok(indices.iter().map(|&i| request.options[i]).collect()),
            Selection::One(_) => Err(mismatched(kind)),
        }
    }

    /// Yes/no question
    pub fn confirm(&mut self, game: &mut GameState, player: PlayerId, kind: PromptKind) -> Result<bool> {
        let chosen = self.choose(game, player, kind, vec![ChoiceOption::Yes, ChoiceOption::No])?;
        Ok(chosen == ChoiceOption::Yes)
    }

    /// Tell both providers how the game went
    pub fn notify_game_end(&mut self, game: &GameState, winner: Option<PlayerId>) {
        for provider in self.providers.iter_mut() {
            let player = provider.player_id();
            let view = GameStateView::new(game, player);
            provider.on_game_end(&view, winner == Some(player));
        }
    }
}

fn mismatched(kind: PromptKind) -> RampartError {
    RampartError::InvariantViolation(format!("{kind:?} answer does not match its constraint"))
}
