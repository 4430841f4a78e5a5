//! Combat resolution
//!
//! Melee and ranged attacks, blocking, wall breaches with trap checks, and
//! the Joker's unblockable damage sequence. Every function here acts on
//! the game immediately; decisions are routed through [`Seats`].

use crate::core::{AbilityKind, AttackType, CardId, DamageCategory, DamageSource, PlayerId, Rank, SubClass};
use crate::error::Precondition;
use crate::game::abilities::AbilityOutcome;
use crate::game::controller::{ChoiceOption, PromptKind, Seats};
use crate::game::events::GameEvent;
use crate::game::state::DamageOutcome;
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// What a declared attack ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Damage reached a Field character
    Hit { target: CardId, outcome: DamageOutcome },
    /// Defender spent a block card; no damage
    Blocked { blocker: CardId },
    /// A non-trap wall card was revealed and discarded
    WallBreached { card: CardId },
    /// Trap revealed and not bypassed: the attacker is destroyed
    TrapSprung { trap: CardId },
    /// Trap revealed and bypassed with a block card
    TrapBypassed { trap: CardId, blocker: CardId },
}

impl AttackOutcome {
    /// Did the attack connect with its target?
    pub fn landed(&self) -> bool {
        match self {
            AttackOutcome::Hit { outcome, .. } => *outcome != DamageOutcome::Ignored,
            AttackOutcome::WallBreached { .. } | AttackOutcome::TrapBypassed { .. } => true,
            AttackOutcome::Blocked { .. } | AttackOutcome::TrapSprung { .. } => false,
        }
    }
}

/// Can the defender block an attack from a card of this rank?
///
/// Joker damage (no rank) is never blockable.
pub fn block_eligible(game: &GameState, defender: PlayerId, attacking_rank: Option<Rank>) -> Result<bool> {
    let Some(rank) = attacking_rank else {
        return Ok(false);
    };
    let zones = game.zones(defender)?;
    let mut in_play = zones
        .characters_in_play()
        .filter_map(|id| game.card(id).ok())
        .filter(|card| card.is_character());

    Ok(match rank {
        Rank::Ace | Rank::Six => in_play.any(|c| c.definition.sub_class == SubClass::HeavyArmor),
        Rank::Queen | Rank::Nine | Rank::Eight => in_play.any(|c| c.definition.is_red_queen()),
        Rank::Five => in_play.any(|c| c.definition.sub_class == SubClass::LiteArmor),
        _ => true,
    })
}

/// Offer the defender a block against damage from `source`
///
/// A block card chosen from hand is discarded and returned.
pub fn offer_block(
    game: &mut GameState,
    seats: &mut Seats,
    defender: PlayerId,
    source: CardId,
) -> Result<Option<CardId>> {
    let rank = game.card(source)?.rank();
    if !block_eligible(game, defender, rank)? {
        return Ok(None);
    }
    let blockers = game.cards_in_zone_where(defender, Zone::Hand, |c| c.definition.can_block())?;
    if blockers.is_empty() {
        return Ok(None);
    }
    let chosen = seats.choose_card_or_pass(game, defender, PromptKind::BlockCard, &blockers)?;
    if let Some(blocker) = chosen {
        game.move_card(blocker, Zone::Hand, Zone::Discard)?;
    }
    Ok(chosen)
}

/// Cards the attacker may strike: opposing Field, or the wall once the Field is empty
fn attack_targets(game: &GameState, attacker_owner: PlayerId) -> Result<(Zone, Vec<CardId>)> {
    let defender = game.opponent(attacker_owner);
    let zones = game.zones(defender)?;
    if !zones.field.is_empty() {
        Ok((Zone::Field, zones.field.cards.clone()))
    } else {
        Ok((Zone::Wall, zones.wall.cards.clone()))
    }
}

/// Melee attack from a Field character
///
/// Precondition failures leave the game untouched.
pub fn melee_attack(game: &mut GameState, seats: &mut Seats, attacker: CardId) -> Result<AttackOutcome> {
    let card = game.card(attacker)?;
    let owner = card.owner;
    if !card.is_character()
        || card.definition.attack_type != AttackType::Melee
        || game.locate(attacker) != Some(Zone::Field)
    {
        return Err(Precondition::NotEligible(attacker).into());
    }
    if card.action_points == 0 {
        return Err(Precondition::NoActionPoints(attacker).into());
    }
    let damage = card.definition.attack_damage();

    let (zone, targets) = attack_targets(game, owner)?;
    if targets.is_empty() {
        return Err(Precondition::NoTarget.into());
    }

    let target = seats.choose_card(game, owner, PromptKind::AttackTarget, &targets)?;
    game.spend_action_point(attacker)?;
    game.emit(GameEvent::AttackDeclared {
        attacker,
        kind: AttackKind::Melee,
        target,
    });

    let outcome = strike(game, seats, attacker, zone, target, damage, DamageCategory::Melee)?;
    if outcome.landed() && game.locate(attacker) == Some(Zone::Field) {
        game.card_mut(attacker)?.has_attacked = true;
    }
    Ok(outcome)
}

/// Ranged attack from a Battlement or Field character
///
/// The attacker must discard a hand card of the damage source its
/// sub-class requires. Without one the attack is reported and rejected
/// before any action point is spent.
pub fn ranged_attack(game: &mut GameState, seats: &mut Seats, attacker: CardId) -> Result<AttackOutcome> {
    let card = game.card(attacker)?;
    let owner = card.owner;
    let in_play = game.locate(attacker).is_some_and(|z| z.is_in_play());
    if !card.is_character() || card.definition.attack_type != AttackType::Ranged || !in_play {
        return Err(Precondition::NotEligible(attacker).into());
    }
    if card.action_points == 0 {
        return Err(Precondition::NoActionPoints(attacker).into());
    }
    let damage = card.definition.attack_damage();

    let Some(required) = card.definition.sub_class.damage_source() else {
        game.emit(GameEvent::RangedAttackPrevented {
            attacker,
            source: None,
        });
        return Err(Precondition::NotEligible(attacker).into());
    };
    let resources = game.cards_in_zone_where(owner, Zone::Hand, |c| c.definition.resource() == Some(required))?;
    if resources.is_empty() {
        game.emit(GameEvent::RangedAttackPrevented {
            attacker,
            source: Some(required),
        });
        return Err(Precondition::MissingDamageSource {
            card: attacker,
            required,
        }
        .into());
    }

    let (zone, targets) = attack_targets(game, owner)?;
    if targets.is_empty() {
        return Err(Precondition::NoTarget.into());
    }

    let resource = seats.choose_card(game, owner, PromptKind::DamageSource, &resources)?;
    game.move_card(resource, Zone::Hand, Zone::Discard)?;
    game.emit(GameEvent::DamageSourceConsumed {
        attacker,
        resource,
        source: required,
    });
    game.spend_action_point(attacker)?;

    let target = seats.choose_card(game, owner, PromptKind::AttackTarget, &targets)?;
    game.emit(GameEvent::AttackDeclared {
        attacker,
        kind: AttackKind::Ranged,
        target,
    });

    let category = match required {
        DamageSource::Ammo => DamageCategory::Ranged,
        DamageSource::Magic => DamageCategory::Magic,
    };
    strike(game, seats, attacker, zone, target, damage, category)
}

/// Resolve a declared attack against a Field character or a wall card
fn strike(
    game: &mut GameState,
    seats: &mut Seats,
    attacker: CardId,
    zone: Zone,
    target: CardId,
    damage: u32,
    category: DamageCategory,
) -> Result<AttackOutcome> {
    let owner = game.card(attacker)?.owner;
    let defender = game.opponent(owner);

    if zone == Zone::Wall {
        game.reveal(target)?;
        if game.card(target)?.is_trap() {
            return trap_check(game, seats, attacker, target);
        }
        game.destroy_card(target)?;
        return Ok(AttackOutcome::WallBreached { card: target });
    }

    if let Some(blocker) = offer_block(game, seats, defender, attacker)? {
        game.emit(GameEvent::AttackBlocked { attacker, blocker });
        return Ok(AttackOutcome::Blocked { blocker });
    }
    let outcome = game.apply_damage(target, damage, category)?;
    Ok(AttackOutcome::Hit { target, outcome })
}

/// A trap was revealed by an attack: bypass it with a block card or lose the attacker
fn trap_check(game: &mut GameState, seats: &mut Seats, attacker: CardId, trap: CardId) -> Result<AttackOutcome> {
    let owner = game.card(attacker)?.owner;
    let blockers = game.cards_in_zone_where(owner, Zone::Hand, |c| c.definition.can_block())?;
    let chosen = if blockers.is_empty() {
        None
    } else {
        seats.choose_card_or_pass(game, owner, PromptKind::TrapBlock, &blockers)?
    };

    let outcome = match chosen {
        Some(blocker) => {
            game.move_card(blocker, Zone::Hand, Zone::Discard)?;
            game.emit(GameEvent::TrapBypassed { trap, blocker });
            AttackOutcome::TrapBypassed { trap, blocker }
        }
        None => {
            game.emit(GameEvent::TrapTriggered { trap, attacker });
            game.destroy_card(attacker)?;
            AttackOutcome::TrapSprung { trap }
        }
    };
    game.destroy_card(trap)?;
    Ok(outcome)
}

/// Joker damage: base plus voluntarily spent action points, unblockable
///
/// Fizzles when the acting player has no character in play. Damage is
/// dealt one point at a time: opposing Field first, then the front of the
/// wall, then the Battlement. Trap-rank wall cards get no trap check here.
pub fn resolve_joker(
    game: &mut GameState,
    seats: &mut Seats,
    player: PlayerId,
    joker: CardId,
    base: u32,
) -> Result<AbilityOutcome> {
    let ability = AbilityKind::UberUnblockableDamage { base };
    if !game.has_character_in_play(player)? {
        game.emit(GameEvent::AbilityFizzled {
            card: joker,
            ability: Some(ability),
            reason: "no character in play".to_string(),
        });
        return Ok(AbilityOutcome::Fizzled);
    }

    let mut damage = base + spend_bonus_points(game, seats, player)?;
    let defender = game.opponent(player);

    while damage > 0 {
        let zones = game.zones(defender)?;
        if !zones.field.is_empty() {
            let field = zones.field.cards.clone();
            let target = seats.choose_card(game, player, PromptKind::JokerDamageTarget, &field)?;
            game.apply_damage(target, 1, DamageCategory::Uber)?;
        } else if let Some(&front) = zones.wall.cards.first() {
            game.reveal(front)?;
            game.destroy_card(front)?;
        } else if !zones.battlement.is_empty() {
            let battlement = zones.battlement.cards.clone();
            let target = seats.choose_card(game, player, PromptKind::JokerDamageTarget, &battlement)?;
            game.apply_damage(target, 1, DamageCategory::Uber)?;
        } else {
            break;
        }
        damage -= 1;
    }

    game.emit(GameEvent::AbilityResolved { card: joker, ability });
    Ok(AbilityOutcome::Resolved)
}

/// Let the Joker's owner spend action points from one zone for +1 damage each
fn spend_bonus_points(game: &mut GameState, seats: &mut Seats, player: PlayerId) -> Result<u32> {
    let mut zones = Vec::new();
    for zone in [Zone::Battlement, Zone::Field] {
        if !game
            .cards_in_zone_where(player, zone, |c| c.is_character() && c.action_points > 0)?
            .is_empty()
        {
            zones.push(ChoiceOption::Zone(zone));
        }
    }
    if zones.is_empty() {
        return Ok(0);
    }

    let ChoiceOption::Zone(zone) = seats.choose(game, player, PromptKind::JokerBonusZone, zones)? else {
        return Ok(0);
    };
    let candidates: Vec<ChoiceOption> = game
        .cards_in_zone_where(player, zone, |c| c.is_character() && c.action_points > 0)?
        .into_iter()
        .map(ChoiceOption::Card)
        .collect();

    let mut bonus = 0;
    for option in seats.choose_subset(game, player, PromptKind::JokerBonusSpend, candidates)? {
        if let Some(card) = option.card() {
            game.spend_action_point(card)?;
            bonus += 1;
        }
    }
    Ok(bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::tests::character;
    use crate::core::{CardDefinition, Suit};
    use crate::game::config::GameConfig;
    use crate::game::events::GameEvent;
    use crate::game::zero_controller::ZeroController;
    use crate::loader::standard_catalog;
    use std::sync::Arc;

    fn setup() -> (GameState, PlayerId, PlayerId) {
        let game = GameState::new_empty("Alice", "Bob", GameConfig::default());
        let [p1, p2] = game.player_ids();
        (game, p1, p2)
    }

    fn standard(rank: Rank, suit: Suit) -> Arc<CardDefinition> {
        let catalog = standard_catalog().unwrap();
        Arc::clone(catalog.get(crate::core::CardIdentity::Standard { rank, suit }).unwrap())
    }

    #[test]
    fn test_melee_without_action_points_changes_nothing() {
        let (mut game, p1, p2) = setup();
        let attacker = game
            .add_card_to_zone(p1, character(Rank::King, Suit::Clubs, 3), Zone::Field)
            .unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 3), Zone::Field)
            .unwrap();
        game.card_mut(attacker).unwrap().action_points = 0;

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let err = melee_attack(&mut game, &mut seats, attacker).unwrap_err();
        assert_eq!(err.precondition(), Some(&Precondition::NoActionPoints(attacker)));
        assert_eq!(game.card(target).unwrap().damage_points, 3);
        assert!(game.pending_events().is_empty());
    }

    #[test]
    fn test_melee_hits_field_and_marks_attacker() {
        let (mut game, p1, p2) = setup();
        let attacker = game
            .add_card_to_zone(p1, character(Rank::King, Suit::Clubs, 3), Zone::Field)
            .unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 4), Zone::Field)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                target,
                outcome: DamageOutcome::Damaged
            }
        );
        assert_eq!(game.card(target).unwrap().damage_points, 1);
        assert_eq!(game.card(attacker).unwrap().action_points, 0);
        assert!(game.card(attacker).unwrap().has_attacked);
    }

    #[test]
    fn test_block_cancels_damage_but_spends_point() {
        let (mut game, p1, p2) = setup();
        let attacker = game
            .add_card_to_zone(p1, character(Rank::King, Suit::Clubs, 3), Zone::Field)
            .unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 3), Zone::Field)
            .unwrap();
        let block = game
            .add_card_to_zone(p2, standard(Rank::Four, Suit::Spades), Zone::Hand)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
        assert_eq!(outcome, AttackOutcome::Blocked { blocker: block });
        assert_eq!(game.card(target).unwrap().damage_points, 3);
        assert_eq!(game.locate(block), Some(Zone::Discard));
        assert_eq!(game.card(attacker).unwrap().action_points, 0);
        assert!(!game.card(attacker).unwrap().has_attacked);
    }

    #[test]
    fn test_block_eligibility_table() {
        let (mut game, _p1, p2) = setup();
        assert!(!block_eligible(&game, p2, Some(Rank::Ace)).unwrap());
        assert!(!block_eligible(&game, p2, Some(Rank::Queen)).unwrap());
        assert!(block_eligible(&game, p2, Some(Rank::King)).unwrap());
        assert!(!block_eligible(&game, p2, None).unwrap());

        game.add_card_to_zone(p2, character(Rank::King, Suit::Spades, 3), Zone::Battlement)
            .unwrap();
        assert!(block_eligible(&game, p2, Some(Rank::Ace)).unwrap());
        assert!(block_eligible(&game, p2, Some(Rank::Six)).unwrap());
        assert!(!block_eligible(&game, p2, Some(Rank::Nine)).unwrap());
        assert!(!block_eligible(&game, p2, Some(Rank::Five)).unwrap());

        game.add_card_to_zone(p2, standard(Rank::Queen, Suit::Hearts), Zone::Field)
            .unwrap();
        assert!(block_eligible(&game, p2, Some(Rank::Eight)).unwrap());
    }

    #[test]
    fn test_ranged_without_source_is_prevented() {
        let (mut game, p1, p2) = setup();
        let archer = game
            .add_card_to_zone(p1, standard(Rank::Jack, Suit::Spades), Zone::Battlement)
            .unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 3), Zone::Field)
            .unwrap();
        // Magic in hand does not feed a LiteArmor marksman
        game.add_card_to_zone(p1, standard(Rank::Nine, Suit::Clubs), Zone::Hand)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let err = ranged_attack(&mut game, &mut seats, archer).unwrap_err();
        assert!(matches!(
            err.precondition(),
            Some(Precondition::MissingDamageSource {
                required: DamageSource::Ammo,
                ..
            })
        ));
        assert_eq!(game.card(archer).unwrap().action_points, 1);
        assert_eq!(game.card(target).unwrap().damage_points, 3);
        assert!(matches!(
            game.pending_events(),
            [GameEvent::RangedAttackPrevented { .. }]
        ));
    }

    #[test]
    fn test_ranged_consumes_source() {
        let (mut game, p1, p2) = setup();
        let archer = game
            .add_card_to_zone(p1, standard(Rank::Jack, Suit::Spades), Zone::Battlement)
            .unwrap();
        let ammo = game
            .add_card_to_zone(p1, standard(Rank::Three, Suit::Clubs), Zone::Hand)
            .unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 3), Zone::Field)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let outcome = ranged_attack(&mut game, &mut seats, archer).unwrap();
        assert!(matches!(outcome, AttackOutcome::Hit { .. }));
        assert_eq!(game.locate(ammo), Some(Zone::Discard));
        assert_eq!(game.card(target).unwrap().damage_points, 1);
        assert!(!game.card(archer).unwrap().has_attacked);
    }

    #[test]
    fn test_trap_destroys_unprotected_attacker() {
        let (mut game, p1, p2) = setup();
        let attacker = game
            .add_card_to_zone(p1, character(Rank::King, Suit::Clubs, 3), Zone::Field)
            .unwrap();
        let trap = game
            .add_card_to_zone(p2, standard(Rank::Seven, Suit::Hearts), Zone::Wall)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let outcome = melee_attack(&mut game, &mut seats, attacker).unwrap();
        assert_eq!(outcome, AttackOutcome::TrapSprung { trap });
        assert_eq!(game.locate(attacker), Some(Zone::Discard));
        assert_eq!(game.locate(trap), Some(Zone::Discard));
        game.audit_invariants().unwrap();
    }

    #[test]
    fn test_joker_fizzles_without_character() {
        let (mut game, p1, p2) = setup();
        let joker = game.add_card_to_deck(p1, standard_catalog().unwrap().joker().clone()).unwrap();
        let target = game
            .add_card_to_zone(p2, character(Rank::King, Suit::Hearts, 3), Zone::Field)
            .unwrap();

        let mut c1 = ZeroController::new(p1);
        let mut c2 = ZeroController::new(p2);
        let mut events: Vec<GameEvent> = Vec::new();
        let mut seats = Seats::new(&mut c1, &mut c2, &mut events);

        let outcome = resolve_joker(&mut game, &mut seats, p1, joker, 2).unwrap();
        assert_eq!(outcome, AbilityOutcome::Fizzled);
        assert_eq!(game.card(target).unwrap().damage_points, 3);
    }
}
