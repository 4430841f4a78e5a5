//! Round manager
//!
//! Drives the fixed phase cycle of a round, asks the decision providers at
//! every choice point, and checks for the end of the game after cleanup.

use crate::core::{AttackType, CardId, PlayerId, Rank};
use crate::game::abilities::{enter_play, resolve_cast};
use crate::game::asp::AspEntry;
use crate::game::combat::{melee_attack, ranged_attack};
use crate::game::controller::{ChoiceOption, DecisionProvider, PromptKind, Seats};
use crate::game::events::{EventSink, GameEvent};
use crate::game::phase::Phase;
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Verbosity level for game output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only game outcome
    Minimal = 1,
    /// Normal - rounds, phases, and key actions (default)
    #[default]
    Normal = 2,
    /// Verbose - every event
    Verbose = 3,
}

/// Reason the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndReason {
    /// The player's hand, field and wall were all empty
    ZonesExhausted(PlayerId),
    /// The player's deck ran out
    DeckExhausted(PlayerId),
    /// Game reached the maximum round limit
    RoundLimit,
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Winner of the game (None on equal scores)
    pub winner: Option<PlayerId>,
    pub rounds_played: u32,
    pub end_reason: GameEndReason,
    pub scores: Vec<(PlayerId, u32)>,
}

/// Treat a failed precondition as "could not act"
fn absorb<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_precondition() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Round manager
///
/// Borrows the game for the duration of play; the game itself can be
/// inspected again once the manager is dropped.
pub struct RoundManager<'a> {
    pub game: &'a mut GameState,
    max_rounds: u32,
}

impl<'a> RoundManager<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        let max_rounds = game.config.max_rounds;
        RoundManager { game, max_rounds }
    }

    /// Set maximum rounds before the game is stopped and scored
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Play rounds until an end condition fires or the round limit is hit
    ///
    /// A fresh game (round 0, empty zones) is dealt its opening walls and
    /// hands first.
    pub fn run_game(
        &mut self,
        player1: &mut dyn DecisionProvider,
        player2: &mut dyn DecisionProvider,
        sink: &mut dyn EventSink,
    ) -> Result<GameResult> {
        let mut seats = Seats::new(player1, player2, sink);

        if self.game.round.round_number == 0 {
            self.game.emit(GameEvent::GameStarted {
                first_player: self.game.first_player(),
                seed: self.game.config.seed,
            });
            let untouched = self
                .game
                .player_ids()
                .into_iter()
                .map(|p| self.game.zones(p).map(|z| z.total_cards() == 0))
                .collect::<Result<Vec<_>>>()?
                .into_iter()
                .all(|empty| empty);
            if untouched {
                self.game.deal_opening()?;
            }
            seats.flush(self.game);
        }

        let end_reason = loop {
            if self.game.round.round_number >= self.max_rounds {
                break GameEndReason::RoundLimit;
            }
            if let Some(reason) = self.run_round(&mut seats)? {
                break reason;
            }
        };

        let winner = self.game.leader()?;
        let scores = self.game.scores()?;
        self.game.emit(GameEvent::GameEnded {
            winner,
            scores: scores.clone(),
            reason: end_reason,
        });
        seats.flush(self.game);
        seats.notify_game_end(self.game, winner);

        Ok(GameResult {
            winner,
            rounds_played: self.game.round.round_number,
            end_reason,
            scores,
        })
    }

    /// Play one full round; returns the end condition if the game is over
    pub fn run_round(&mut self, seats: &mut Seats) -> Result<Option<GameEndReason>> {
        self.game.round.start_round();
        let round = self.game.round.round_number;
        self.game.emit(GameEvent::RoundStarted {
            round,
            first_player: self.game.first_player(),
        });

        loop {
            let phase = self.game.round.current_phase;
            self.game.emit(GameEvent::PhaseEntered { round, phase });
            self.run_phase(seats, phase)?;
            self.game.emit(GameEvent::PhaseExited { round, phase });
            seats.flush(self.game);
            if !self.game.round.advance_phase() {
                break;
            }
        }

        self.game.emit(GameEvent::RoundEnded { round });
        seats.flush(self.game);
        self.game.end_condition()
    }

    pub fn run_phase(&mut self, seats: &mut Seats, phase: Phase) -> Result<()> {
        match phase {
            Phase::Draw => self.draw_phase(seats),
            Phase::AspPlacement => self.placement_phase(seats),
            Phase::AspResolution => self.resolution_phase(seats),
            Phase::Movement => self.movement_phase(seats),
            Phase::Melee => self.melee_phase(seats),
            Phase::Ranged => self.ranged_phase(seats),
            Phase::Refortify => self.refortify_phase(seats),
            Phase::Cleanup => self.cleanup_phase(),
        }
    }

    fn hand_is_empty(&self, player: PlayerId) -> Result<bool> {
        Ok(self.game.zones(player)?.hand.is_empty())
    }

    fn draw_five(&mut self, player: PlayerId) -> Result<()> {
        for _ in 0..5 {
            if self.game.draw_card(player)?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Token holder with an empty hand may pass the token and draw five;
    /// the new holder gets the same offer once. Everyone else may draw one.
    fn draw_phase(&mut self, seats: &mut Seats) -> Result<()> {
        let mut drew_five: Vec<PlayerId> = Vec::with_capacity(2);

        for _ in 0..2 {
            let holder = self.game.first_player();
            if drew_five.contains(&holder) || !self.hand_is_empty(holder)? {
                break;
            }
            if !seats.confirm(self.game, holder, PromptKind::PassFirstToken)? {
                break;
            }
            self.game.pass_first_token();
            self.draw_five(holder)?;
            drew_five.push(holder);
        }

        for player in self.game.turn_order() {
            if drew_five.contains(&player) {
                continue;
            }
            if seats.confirm(self.game, player, PromptKind::DrawCard)? {
                self.game.draw_card(player)?;
            }
        }
        Ok(())
    }

    /// Alternate commits to the ASP until someone places the token
    fn placement_phase(&mut self, seats: &mut Seats) -> Result<()> {
        let mut current = self.game.first_player();
        loop {
            let mut options: Vec<ChoiceOption> = self
                .game
                .zones(current)?
                .hand
                .cards
                .iter()
                .copied()
                .map(ChoiceOption::Card)
                .collect();
            options.push(ChoiceOption::PlaceToken);

            match seats.choose(self.game, current, PromptKind::AspPlacement, options)? {
                ChoiceOption::Card(card) => self.game.commit_to_asp(current, card)?,
                _ => {
                    self.game.emit(GameEvent::TokenPlaced { player: current });
                    return Ok(());
                }
            }
            current = self.game.opponent(current);
        }
    }

    /// Pop the ASP last-in first-out
    fn resolution_phase(&mut self, seats: &mut Seats) -> Result<()> {
        while let Some(entry) = self.game.asp.pop() {
            self.resolve_entry(seats, entry)?;
            seats.flush(self.game);
        }
        Ok(())
    }

    fn resolve_entry(&mut self, seats: &mut Seats, entry: AspEntry) -> Result<()> {
        let AspEntry { player, card } = entry;

        if self.game.card(card)?.is_trap() {
            let options = vec![ChoiceOption::SetTrap, ChoiceOption::Discard];
            let zone = match seats.choose(self.game, player, PromptKind::TrapResolution, options)? {
                ChoiceOption::SetTrap => Zone::Wall,
                _ => Zone::Discard,
            };
            self.game.place_card(card, zone)?;
            return Ok(());
        }

        let options = vec![ChoiceOption::Reveal, ChoiceOption::Discard, ChoiceOption::PlaceInWall];
        match seats.choose(self.game, player, PromptKind::AspResolution, options)? {
            ChoiceOption::Reveal => {
                self.game.reveal(card)?;
                if self.game.card(card)?.is_character() {
                    let zones = vec![ChoiceOption::Zone(Zone::Battlement), ChoiceOption::Zone(Zone::Field)];
                    let zone = match seats.choose(self.game, player, PromptKind::CharacterPlacement, zones)? {
                        ChoiceOption::Zone(zone) => zone,
                        _ => Zone::Battlement,
                    };
                    self.game.place_card(card, zone)?;
                    absorb(enter_play(self.game, seats, player, card))?;
                } else {
                    absorb(resolve_cast(self.game, seats, player, card))?;
                    self.game.place_card(card, Zone::Discard)?;
                }
            }
            ChoiceOption::PlaceInWall => {
                self.game.place_card(card, Zone::Wall)?;
            }
            _ => {
                self.game.place_card(card, Zone::Discard)?;
            }
        }
        Ok(())
    }

    /// Each player may advance any Battlement characters to the Field
    fn movement_phase(&mut self, seats: &mut Seats) -> Result<()> {
        for player in self.game.turn_order() {
            let candidates: Vec<ChoiceOption> = self
                .game
                .cards_in_zone_where(player, Zone::Battlement, |c| c.is_character())?
                .into_iter()
                .map(ChoiceOption::Card)
                .collect();
            if candidates.is_empty() {
                continue;
            }
            for option in seats.choose_subset(self.game, player, PromptKind::MoveToField, candidates)? {
                if let Some(card) = option.card() {
                    self.game.move_card(card, Zone::Battlement, Zone::Field)?;
                }
            }
        }
        Ok(())
    }

    fn opponent_has_targets(&self, player: PlayerId) -> Result<bool> {
        let zones = self.game.zones(self.game.opponent(player))?;
        Ok(!zones.field.is_empty() || !zones.wall.is_empty())
    }

    /// Characters of a zone set able to attack with the given attack type
    fn attackers(
        &self,
        player: PlayerId,
        zones: &[Zone],
        attack_type: AttackType,
        excluded: &[CardId],
    ) -> Result<Vec<CardId>> {
        let mut found = Vec::new();
        for &zone in zones {
            found.extend(self.game.cards_in_zone_where(player, zone, |c| {
                c.is_character()
                    && c.definition.attack_type == attack_type
                    && c.action_points > 0
                    && !excluded.contains(&c.id)
            })?);
        }
        Ok(found)
    }

    fn melee_phase(&mut self, seats: &mut Seats) -> Result<()> {
        for player in self.game.turn_order() {
            let mut excluded = Vec::new();
            loop {
                let candidates = self.attackers(player, &[Zone::Field], AttackType::Melee, &excluded)?;
                if candidates.is_empty() || !self.opponent_has_targets(player)? {
                    break;
                }
                let Some(attacker) =
                    seats.choose_card_or_pass(self.game, player, PromptKind::MeleeAttacker, &candidates)?
                else {
                    break;
                };
                if absorb(melee_attack(self.game, seats, attacker))?.is_none() {
                    excluded.push(attacker);
                }
                seats.flush(self.game);
            }
        }
        Ok(())
    }

    /// Like melee, from either zone; a character that cannot fire sits out the rest of the phase
    fn ranged_phase(&mut self, seats: &mut Seats) -> Result<()> {
        for player in self.game.turn_order() {
            let mut excluded = Vec::new();
            loop {
                let candidates = self.attackers(
                    player,
                    &[Zone::Battlement, Zone::Field],
                    AttackType::Ranged,
                    &excluded,
                )?;
                if candidates.is_empty() || !self.opponent_has_targets(player)? {
                    break;
                }
                let Some(attacker) =
                    seats.choose_card_or_pass(self.game, player, PromptKind::RangedAttacker, &candidates)?
                else {
                    break;
                };
                if absorb(ranged_attack(self.game, seats, attacker))?.is_none() {
                    excluded.push(attacker);
                }
                seats.flush(self.game);
            }
        }
        Ok(())
    }

    /// Spend leftover action points on secondary actions
    fn refortify_phase(&mut self, seats: &mut Seats) -> Result<()> {
        for player in self.game.turn_order() {
            loop {
                if self.game.unused_action_points(player)? == 0 {
                    break;
                }
                let payers: Vec<CardId> = self
                    .game
                    .zones(player)?
                    .characters_in_play()
                    .filter(|&id| self.game.card(id).is_ok_and(|c| c.action_points > 0))
                    .collect();

                let hand = self.game.zones(player)?.hand.cards.clone();
                let tens = self
                    .game
                    .cards_in_zone_where(player, Zone::Hand, |c| c.rank() == Some(Rank::Ten))?;
                let traps = self.game.cards_in_zone_where(player, Zone::Discard, |c| c.is_trap())?;
                let wall_full = self.game.zones(player)?.wall_is_full();

                let mut actions = Vec::new();
                if !hand.is_empty() {
                    actions.push(ChoiceOption::PlaceInWall);
                    actions.push(ChoiceOption::Discard);
                }
                if !tens.is_empty() {
                    actions.push(ChoiceOption::DrawWithTen);
                }
                if !traps.is_empty() && !wall_full {
                    actions.push(ChoiceOption::ResetTrap);
                }
                actions.push(ChoiceOption::Pass);

                let action = seats.choose(self.game, player, PromptKind::RefortifyAction, actions)?;
                let (from, to, pool) = match action {
                    ChoiceOption::PlaceInWall => (Zone::Hand, Zone::Wall, hand),
                    ChoiceOption::Discard => (Zone::Hand, Zone::Discard, hand),
                    ChoiceOption::DrawWithTen => (Zone::Hand, Zone::Discard, tens),
                    ChoiceOption::ResetTrap => (Zone::Discard, Zone::Wall, traps),
                    _ => break,
                };

                let payer = seats.choose_card(self.game, player, PromptKind::RefortifyPayer, &payers)?;
                let card = seats.choose_card(self.game, player, PromptKind::RefortifyCard, &pool)?;
                self.game.spend_action_point(payer)?;
                self.game.move_card(card, from, to)?;
                if action == ChoiceOption::DrawWithTen {
                    self.game.draw_card(player)?;
                }
                seats.flush(self.game);
            }
        }
        Ok(())
    }

    /// Reset action points, clear out anything at zero damage points, audit
    fn cleanup_phase(&mut self) -> Result<()> {
        for player in self.game.player_ids() {
            let in_play: Vec<CardId> = self.game.zones(player)?.characters_in_play().collect();
            for id in in_play {
                let card = self.game.card_mut(id)?;
                card.reset_for_round();
                if card.damage_points == 0 {
                    self.game.destroy_card(id)?;
                }
            }
        }
        self.game.audit_invariants()
    }
}
