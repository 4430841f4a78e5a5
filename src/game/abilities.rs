//! Ability resolution
//!
//! Dispatches on the closed [`AbilityKind`] set. Abilities that cannot
//! find what they need fizzle with an `AbilityFizzled` event; that is an
//! outcome, not an error.

use crate::core::{AbilityKind, CardId, DamageCategory, PlayerId};
use crate::game::combat::{offer_block, resolve_joker};
use crate::game::controller::{ChoiceOption, PromptKind, Seats};
use crate::game::events::GameEvent;
use crate::game::GameState;
use crate::zones::Zone;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    Resolved,
    Fizzled,
}

fn fizzle(game: &mut GameState, card: CardId, ability: Option<AbilityKind>, reason: &str) -> AbilityOutcome {
    game.emit(GameEvent::AbilityFizzled {
        card,
        ability,
        reason: reason.to_string(),
    });
    AbilityOutcome::Fizzled
}

/// Execute one ability on behalf of `player`, sourced from `source`
pub fn resolve_ability(
    game: &mut GameState,
    seats: &mut Seats,
    player: PlayerId,
    source: CardId,
    ability: &AbilityKind,
) -> Result<AbilityOutcome> {
    let outcome = match ability {
        AbilityKind::InvulnerabilityGrant { categories } => {
            game.card_mut(source)?.grant_immunity(categories);
            AbilityOutcome::Resolved
        }
        AbilityKind::RetributionOnMeleeHit => {
            let opponent = game.opponent(player);
            let attackers = game.cards_in_zone_where(opponent, Zone::Field, |c| c.has_attacked)?;
            for card in attackers {
                game.destroy_card(card)?;
            }
            AbilityOutcome::Resolved
        }
        AbilityKind::DrawTwoCards => {
            let opponent = game.opponent(player);
            let options = vec![ChoiceOption::Player(player), ChoiceOption::Player(opponent)];
            let drawer = match seats.choose(game, player, PromptKind::DrawTwoTarget, options)? {
                ChoiceOption::Player(id) => id,
                _ => player,
            };
            for _ in 0..2 {
                game.draw_card(drawer)?;
            }
            AbilityOutcome::Resolved
        }
        AbilityKind::AmmoRangedDamage(amount) => {
            targeted_damage(game, seats, player, source, ability, *amount, DamageCategory::Ranged)?
        }
        AbilityKind::MagicRangedOrBlock(amount) => {
            targeted_damage(game, seats, player, source, ability, *amount, DamageCategory::Magic)?
        }
        AbilityKind::ArmorBlockOrDamage => {
            let amount = game.card(source)?.definition.attack_value;
            targeted_damage(game, seats, player, source, ability, amount, DamageCategory::Melee)?
        }
        AbilityKind::InstantBlock => {
            // Only meaningful when spent from hand against an attack
            return Ok(fizzle(game, source, Some(ability.clone()), "nothing to block"));
        }
        AbilityKind::UberUnblockableDamage { base } => {
            return resolve_joker(game, seats, player, source, *base);
        }
        AbilityKind::JokerBonusDamage => {
            return resolve_joker(game, seats, player, source, AbilityKind::JOKER_BASE_DAMAGE);
        }
    };

    if outcome == AbilityOutcome::Resolved {
        game.emit(GameEvent::AbilityResolved {
            card: source,
            ability: ability.clone(),
        });
    }
    Ok(outcome)
}

/// Damage aimed at one opposing Field character, which may be blocked
fn targeted_damage(
    game: &mut GameState,
    seats: &mut Seats,
    player: PlayerId,
    source: CardId,
    ability: &AbilityKind,
    amount: u32,
    category: DamageCategory,
) -> Result<AbilityOutcome> {
    let opponent = game.opponent(player);
    let targets = game.cards_in_zone_where(opponent, Zone::Field, |c| c.is_character())?;
    if targets.is_empty() {
        return Ok(fizzle(game, source, Some(ability.clone()), "no target in the opposing field"));
    }

    let target = seats.choose_card(game, player, PromptKind::AbilityTarget, &targets)?;
    if let Some(blocker) = offer_block(game, seats, opponent, source)? {
        game.emit(GameEvent::AttackBlocked {
            attacker: source,
            blocker,
        });
        return Ok(AbilityOutcome::Resolved);
    }
    game.apply_damage(target, amount, category)?;
    Ok(AbilityOutcome::Resolved)
}

/// Run a revealed card's cast ability
pub fn resolve_cast(game: &mut GameState, seats: &mut Seats, player: PlayerId, card: CardId) -> Result<AbilityOutcome> {
    let cast = game.card(card)?.definition.cast_ability.clone();
    match cast {
        Some(ability) => resolve_ability(game, seats, player, card, &ability),
        None => Ok(fizzle(game, card, None, "card has no cast ability")),
    }
}

/// Trigger a character's special ability as it enters play
///
/// Non-characters and cards without the trigger flag do nothing. The Joker
/// is never a character: its damage comes only from its cast.
pub fn enter_play(game: &mut GameState, seats: &mut Seats, player: PlayerId, card: CardId) -> Result<Option<AbilityOutcome>> {
    let definition = &game.card(card)?.definition;
    if !definition.is_character || !definition.special_ability_trigger {
        return Ok(None);
    }
    let special = definition.special_ability.clone();
    match special {
        Some(ability) => resolve_ability(game, seats, player, card, &ability).map(Some),
        None => Ok(None),
    }
}
