//! Main game state structure

use crate::core::{Card, CardDefinition, CardId, DamageCategory, EntityStore, Player, PlayerId, PlayerName};
use crate::deck::{Deck, ShuffleProvider};
use crate::error::Precondition;
use crate::game::asp::ActionSequencePile;
use crate::game::config::GameConfig;
use crate::game::events::GameEvent;
use crate::game::phase::RoundStructure;
use crate::game::round::GameEndReason;
use crate::loader::Catalog;
use crate::zones::{PlayerZones, Zone};
use crate::{RampartError, Result};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a single damage application did to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target is immune to the damage category
    Ignored,
    Damaged,
    Destroyed,
}

/// Complete game state
///
/// Owns every card instance, both players' zones and decks, the ASP and
/// the round bookkeeping. Mutations go through the methods here so that
/// orientation, play-only flags and events stay consistent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All cards in the game; never shrinks
    pub cards: EntityStore<Card>,

    /// Both players, in seat order
    pub players: Vec<Player>,

    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    pub decks: Vec<(PlayerId, Deck)>,

    pub asp: ActionSequencePile,

    pub round: RoundStructure,

    pub config: GameConfig,

    /// Events recorded since the last drain
    #[serde(skip)]
    outbox: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with two players and shuffled decks
    ///
    /// Each deck holds two copies of every catalog definition plus two
    /// Jokers and is shuffled exactly once, here.
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        catalog: &Catalog,
        config: GameConfig,
        shuffler: &mut dyn ShuffleProvider,
    ) -> Self {
        let mut game = Self::new_empty(player1_name, player2_name, config);

        for player_id in game.player_ids() {
            let mut card_ids = Vec::with_capacity(catalog.deck_size());
            for _copy in 0..2 {
                for definition in catalog.definitions() {
                    card_ids.push(game.create_card(player_id, Arc::clone(definition)));
                }
            }
            for _ in 0..2 {
                card_ids.push(game.create_card(player_id, Arc::clone(catalog.joker())));
            }
            game.decks
                .push((player_id, Deck::new(player_id, card_ids, shuffler)));
        }

        game
    }

    /// Create a game with empty decks and zones
    ///
    /// Cards are added afterwards with [`GameState::add_card_to_zone`] or
    /// [`GameState::add_card_to_deck`]; used to stage specific situations.
    pub fn new_empty(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        config: GameConfig,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);

        let players = vec![Player::new(p1_id, player1_name), Player::new(p2_id, player2_name)];
        let player_zones = vec![
            (p1_id, PlayerZones::with_wall_capacity(p1_id, config.wall_capacity)),
            (p2_id, PlayerZones::with_wall_capacity(p2_id, config.wall_capacity)),
        ];

        GameState {
            cards: EntityStore::new(),
            players,
            player_zones,
            decks: Vec::new(),
            asp: ActionSequencePile::new(),
            round: RoundStructure::new(p1_id),
            config,
            outbox: Vec::new(),
        }
    }

    fn create_card(&mut self, owner: PlayerId, definition: Arc<CardDefinition>) -> CardId {
        let id = self.cards.next_id();
        self.cards.insert(id, Card::new(id, owner, definition));
        id
    }

    /// Create a card directly in one of a player's zones (no events)
    pub fn add_card_to_zone(
        &mut self,
        owner: PlayerId,
        definition: Arc<CardDefinition>,
        zone: Zone,
    ) -> Result<CardId> {
        let id = self.create_card(owner, definition);
        let landed = self.zones_mut(owner)?.add(id, zone);
        self.set_orientation(id, landed)?;
        Ok(id)
    }

    /// Create a card on top of a player's deck (no events)
    pub fn add_card_to_deck(&mut self, owner: PlayerId, definition: Arc<CardDefinition>) -> Result<CardId> {
        let id = self.create_card(owner, definition);
        if !self.decks.iter().any(|(p, _)| *p == owner) {
            self.decks
                .push((owner, Deck::new(owner, Vec::new(), &mut crate::deck::IdentityShuffle)));
        }
        self.deck_mut(owner)?.put_on_top(id);
        Ok(id)
    }

    pub fn player_ids(&self) -> [PlayerId; 2] {
        [self.players[0].id, self.players[1].id]
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(RampartError::EntityNotFound(id.as_u32()))
    }

    /// For 2-player games, the other player
    pub fn opponent(&self, player: PlayerId) -> PlayerId {
        let [p1, p2] = self.player_ids();
        if player == p1 {
            p2
        } else {
            p1
        }
    }

    /// Acting order for every phase: token holder first
    pub fn turn_order(&self) -> [PlayerId; 2] {
        let first = self.round.first_player;
        [first, self.opponent(first)]
    }

    pub fn first_player(&self) -> PlayerId {
        self.round.first_player
    }

    pub fn zones(&self, player: PlayerId) -> Result<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, zones)| zones)
            .ok_or(RampartError::EntityNotFound(player.as_u32()))
    }

    pub fn zones_mut(&mut self, player: PlayerId) -> Result<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player)
            .map(|(_, zones)| zones)
            .ok_or(RampartError::EntityNotFound(player.as_u32()))
    }

    pub fn deck(&self, player: PlayerId) -> Result<&Deck> {
        self.decks
            .iter()
            .find(|(id, _)| *id == player)
            .map(|(_, deck)| deck)
            .ok_or(RampartError::EntityNotFound(player.as_u32()))
    }

    pub fn deck_mut(&mut self, player: PlayerId) -> Result<&mut Deck> {
        self.decks
            .iter_mut()
            .find(|(id, _)| *id == player)
            .map(|(_, deck)| deck)
            .ok_or(RampartError::EntityNotFound(player.as_u32()))
    }

    pub fn deck_len(&self, player: PlayerId) -> usize {
        self.deck(player).map(Deck::len).unwrap_or(0)
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Zone currently holding the card (None for deck, ASP or unknown)
    pub fn locate(&self, id: CardId) -> Option<Zone> {
        let owner = self.cards.get(id).ok()?.owner;
        self.zones(owner).ok()?.locate(id)
    }

    /// Action points still held by the player's characters in play
    pub fn unused_action_points(&self, player: PlayerId) -> Result<u32> {
        Ok(self.zones(player)?.unused_action_points(&self.cards))
    }

    pub fn has_character_in_play(&self, player: PlayerId) -> Result<bool> {
        Ok(self.zones(player)?.has_character_anywhere(&self.cards))
    }

    /// Cards of a zone matching a predicate, in zone order
    pub fn cards_in_zone_where(
        &self,
        player: PlayerId,
        zone: Zone,
        predicate: impl Fn(&Card) -> bool,
    ) -> Result<Vec<CardId>> {
        let zones = self.zones(player)?;
        Ok(zones
            .get_zone(zone)
            .cards
            .iter()
            .copied()
            .filter(|&id| self.cards.get(id).map(&predicate).unwrap_or(false))
            .collect())
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.outbox.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.outbox
    }

    /// Deal the opening wall and hand to each player
    pub fn deal_opening(&mut self) -> Result<()> {
        for player in self.player_ids() {
            for _ in 0..self.config.initial_wall {
                if self.draw_into(player, Zone::Wall)?.is_none() {
                    break;
                }
            }
            for _ in 0..self.config.initial_hand {
                if self.draw_card(player)?.is_none() {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Draw the top card into the player's hand
    ///
    /// An exhausted deck is not an error: it yields None and a DeckEmpty event.
    pub fn draw_card(&mut self, player: PlayerId) -> Result<Option<CardId>> {
        self.draw_into(player, Zone::Hand)
    }

    pub fn draw_into(&mut self, player: PlayerId, zone: Zone) -> Result<Option<CardId>> {
        let Some(card) = self.deck_mut(player)?.draw() else {
            self.emit(GameEvent::DeckEmpty { player });
            return Ok(None);
        };
        self.emit(GameEvent::CardDrawn { player, card });
        self.place_card(card, zone)?;
        Ok(Some(card))
    }

    fn set_orientation(&mut self, card: CardId, zone: Zone) -> Result<()> {
        self.card_mut(card)?.face_down = matches!(zone, Zone::Wall | Zone::Hand);
        Ok(())
    }

    /// Put a card that is in no zone (fresh from the deck or the ASP) into a zone
    ///
    /// Returns the zone it actually landed in (a full wall redirects to Discard).
    pub fn place_card(&mut self, card: CardId, zone: Zone) -> Result<Zone> {
        let owner = self.card(card)?.owner;
        let landed = self.zones_mut(owner)?.add(card, zone);
        self.set_orientation(card, landed)?;
        self.emit(GameEvent::CardPlaced {
            player: owner,
            card,
            zone: landed,
        });
        if landed != zone {
            self.emit(GameEvent::WallOverflow {
                player: owner,
                card,
            });
        }
        Ok(landed)
    }

    /// Move a card between two of its owner's zones
    pub fn move_card(&mut self, card: CardId, from: Zone, to: Zone) -> Result<Zone> {
        let owner = self.card(card)?.owner;
        let landed = self.zones_mut(owner)?.move_card(card, from, to)?;

        {
            let card = self.card_mut(card)?;
            if from == Zone::Discard {
                card.revive();
            } else if from.is_in_play() && !landed.is_in_play() {
                card.leave_play();
            }
        }
        self.set_orientation(card, landed)?;

        self.emit(GameEvent::CardMoved {
            card,
            from,
            to: landed,
        });
        if landed != to {
            self.emit(GameEvent::WallOverflow {
                player: owner,
                card,
            });
        }
        Ok(landed)
    }

    /// Send a card to its owner's discard pile; a no-op if already there
    ///
    /// A card still on the ASP or in the deck is taken out of it first.
    pub fn destroy_card(&mut self, card: CardId) -> Result<bool> {
        let owner = self.card(card)?.owner;
        if self.locate(card).is_none() && self.asp.remove(card).is_none() {
            if let Ok(deck) = self.deck_mut(owner) {
                deck.remove(card);
            }
        }
        if !self.zones_mut(owner)?.destroy(card) {
            return Ok(false);
        }
        {
            let card = self.card_mut(card)?;
            card.destroyed = true;
            card.face_down = false;
            card.leave_play();
        }
        self.emit(GameEvent::CardDestroyed { card });
        Ok(true)
    }

    /// Apply damage of a category to a card, destroying it at zero
    pub fn apply_damage(
        &mut self,
        card: CardId,
        amount: u32,
        category: DamageCategory,
    ) -> Result<DamageOutcome> {
        let target = self.card_mut(card)?;
        if target.is_immune_to(category) {
            self.emit(GameEvent::DamageIgnored { card, category });
            return Ok(DamageOutcome::Ignored);
        }
        let destroyed_now = target.apply_damage(amount);
        let remaining = target.damage_points;
        self.emit(GameEvent::DamageApplied {
            card,
            amount,
            category,
            remaining,
        });
        if destroyed_now {
            self.destroy_card(card)?;
            return Ok(DamageOutcome::Destroyed);
        }
        Ok(DamageOutcome::Damaged)
    }

    pub fn spend_action_point(&mut self, card: CardId) -> Result<()> {
        let target = self.card_mut(card)?;
        target.spend_action_point()?;
        let remaining = target.action_points;
        self.emit(GameEvent::ActionPointSpent { card, remaining });
        Ok(())
    }

    /// Turn a face-down card face up; already visible cards stay as they are
    pub fn reveal(&mut self, card: CardId) -> Result<()> {
        let target = self.card_mut(card)?;
        if !target.face_down {
            return Ok(());
        }
        target.flip();
        self.emit(GameEvent::CardRevealed { card });
        Ok(())
    }

    /// Commit a hand card face-down to the ASP
    pub fn commit_to_asp(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        if !self.zones_mut(player)?.hand.remove(card) {
            return Err(Precondition::NotInZone {
                card,
                zone: Zone::Hand,
            }
            .into());
        }
        self.asp.push(player, card);
        self.card_mut(card)?.face_down = true;
        self.emit(GameEvent::CardCommitted { player, card });
        Ok(())
    }

    /// Hand the first-player token to the other player
    pub fn pass_first_token(&mut self) -> PlayerId {
        let from = self.round.first_player;
        let to = self.opponent(from);
        self.round.first_player = to;
        self.emit(GameEvent::FirstTokenPassed { from, to });
        to
    }

    /// 2 per character in the Field Zone plus 2 per trap-rank card in the wall
    pub fn score(&self, player: PlayerId) -> Result<u32> {
        let zones = self.zones(player)?;
        let field_characters = zones
            .field
            .cards
            .iter()
            .filter(|&&id| self.cards.get(id).map(Card::is_character).unwrap_or(false))
            .count() as u32;
        let wall_traps = zones
            .wall
            .cards
            .iter()
            .filter(|&&id| self.cards.get(id).map(|c| c.is_trap() && c.face_down).unwrap_or(false))
            .count() as u32;
        Ok(2 * field_characters + 2 * wall_traps)
    }

    pub fn scores(&self) -> Result<Vec<(PlayerId, u32)>> {
        self.player_ids()
            .into_iter()
            .map(|p| Ok((p, self.score(p)?)))
            .collect()
    }

    /// Higher score wins; equal scores are a draw
    pub fn leader(&self) -> Result<Option<PlayerId>> {
        let [p1, p2] = self.player_ids();
        let (s1, s2) = (self.score(p1)?, self.score(p2)?);
        Ok(match s1.cmp(&s2) {
            std::cmp::Ordering::Greater => Some(p1),
            std::cmp::Ordering::Less => Some(p2),
            std::cmp::Ordering::Equal => None,
        })
    }

    /// Why the game should end now, if it should
    pub fn end_condition(&self) -> Result<Option<GameEndReason>> {
        for player in self.player_ids() {
            let zones = self.zones(player)?;
            if zones.hand.is_empty() && zones.field.is_empty() && zones.wall.is_empty() {
                return Ok(Some(GameEndReason::ZonesExhausted(player)));
            }
        }
        for player in self.player_ids() {
            if self.deck_len(player) == 0 {
                return Ok(Some(GameEndReason::DeckExhausted(player)));
            }
        }
        Ok(None)
    }

    /// Deck + zones + ASP cards owned by a player
    pub fn total_cards(&self, player: PlayerId) -> Result<usize> {
        Ok(self.deck_len(player) + self.zones(player)?.total_cards() + self.asp.cards_of(player).count())
    }

    /// Check the structural invariants
    ///
    /// Every card is held by exactly one container of its owner, nothing
    /// is orphaned, and no destroyed card remains in play.
    pub fn audit_invariants(&self) -> Result<()> {
        let mut seen: FxHashSet<CardId> = FxHashSet::default();

        for player in self.player_ids() {
            let zones = self.zones(player)?;
            let deck_cards = self.deck(player).map(Deck::cards).unwrap_or(&[]);
            let held = zones
                .all_cards()
                .chain(deck_cards.iter().copied())
                .chain(self.asp.cards_of(player));

            for id in held {
                if !seen.insert(id) {
                    return Err(RampartError::InvariantViolation(format!(
                        "card {id} is held in two places"
                    )));
                }
                let card = self.cards.get(id).map_err(|_| {
                    RampartError::InvariantViolation(format!("zone references unknown card {id}"))
                })?;
                if card.owner != player {
                    return Err(RampartError::InvariantViolation(format!(
                        "card {id} owned by player {} is held by player {player}",
                        card.owner
                    )));
                }
            }

            for id in zones.characters_in_play() {
                let card = self.card(id)?;
                if card.destroyed || card.damage_points == 0 {
                    return Err(RampartError::InvariantViolation(format!(
                        "destroyed card {id} is still in play"
                    )));
                }
            }
        }

        for id in self.cards.ids() {
            if !seen.contains(&id) {
                return Err(RampartError::InvariantViolation(format!(
                    "card {id} is not held by any zone"
                )));
            }
        }
        Ok(())
    }
}
