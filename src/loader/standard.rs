//! Built-in standard catalog
//!
//! Every rank of every suit, with the Joker kept separately. Rows are
//! ordered Ace to Two, suits in `Suit::ALL` order, so catalog IDs are stable.

use crate::core::{
    AbilityKind, AttackType, CardClass, CardDefinition, CardIdentity, CatalogId, Rank, SubClass,
    Suit,
};
use crate::loader::catalog::{is_two_eyed, Catalog};
use crate::Result;
use std::sync::Arc;

/// Per-rank stats shared by all four suits
struct RankProfile {
    class: CardClass,
    sub_class: SubClass,
    attack_type: AttackType,
    attack_value: u32,
    damage_bonus: u32,
    damage_points: u32,
    cast_ability: Option<AbilityKind>,
}

fn profile(rank: Rank) -> RankProfile {
    use AttackType::{Melee, Ranged};
    use CardClass::{Item, Mage, Marksman, Trap, Warrior};
    let unarmed = AttackType::None;
    let plain = SubClass::None;

    let (class, sub_class, attack_type, attack_value, damage_bonus, damage_points, cast_ability) =
        match rank {
            Rank::Ace => (Warrior, SubClass::HeavyArmor, Melee, 3, 1, 4, None),
            Rank::King => (Warrior, SubClass::HeavyArmor, Melee, 3, 0, 3, None),
            Rank::Queen => (Mage, SubClass::Arcane, Ranged, 2, 1, 2, None),
            Rank::Jack => (Marksman, SubClass::LiteArmor, Ranged, 2, 0, 2, None),
            Rank::Ten => (Item, plain, unarmed, 0, 0, 1, Some(AbilityKind::DrawTwoCards)),
            Rank::Nine => (Item, plain, Ranged, 2, 0, 1, Some(AbilityKind::MagicRangedOrBlock(2))),
            Rank::Eight => (Item, plain, Ranged, 1, 0, 1, Some(AbilityKind::MagicRangedOrBlock(1))),
            Rank::Seven => (Trap, plain, unarmed, 0, 0, 1, None),
            Rank::Six => (Item, SubClass::HeavyArmor, Melee, 1, 0, 1, Some(AbilityKind::ArmorBlockOrDamage)),
            Rank::Five => (Item, SubClass::LiteArmor, Melee, 1, 0, 1, Some(AbilityKind::ArmorBlockOrDamage)),
            Rank::Four => (Item, plain, unarmed, 0, 0, 1, Some(AbilityKind::InstantBlock)),
            Rank::Three => (Item, plain, Ranged, 2, 0, 1, Some(AbilityKind::AmmoRangedDamage(2))),
            Rank::Two => (Item, plain, Ranged, 1, 0, 1, Some(AbilityKind::AmmoRangedDamage(1))),
        };

    RankProfile {
        class,
        sub_class,
        attack_type,
        attack_value,
        damage_bonus,
        damage_points,
        cast_ability,
    }
}

/// Unique per-card abilities triggered on entering play
fn special_ability(identity: CardIdentity) -> Option<AbilityKind> {
    match identity {
        CardIdentity::Standard {
            rank: Rank::Ace,
            suit: Suit::Spades,
        } => Some(AbilityKind::RetributionOnMeleeHit),
        CardIdentity::Standard {
            rank: Rank::Ace,
            suit: Suit::Hearts,
        } => Some(AbilityKind::magic_ranged_immunity()),
        _ => None,
    }
}

pub fn standard_definition(catalog_id: CatalogId, rank: Rank, suit: Suit) -> CardDefinition {
    let identity = CardIdentity::Standard { rank, suit };
    let profile = profile(rank);
    let is_character = profile.class.is_character();
    let two_action_point_baseline = is_two_eyed(identity);
    let special_ability = special_ability(identity);

    CardDefinition {
        catalog_id,
        identity,
        class: profile.class,
        sub_class: profile.sub_class,
        attack_type: profile.attack_type,
        attack_value: profile.attack_value,
        damage_bonus: profile.damage_bonus,
        max_damage_points: profile.damage_points,
        max_action_points: CardDefinition::baseline_for(is_character, two_action_point_baseline),
        is_character,
        special_ability_trigger: special_ability.is_some(),
        cast_ability: profile.cast_ability,
        special_ability,
        two_action_point_baseline,
    }
}

pub fn joker_definition(catalog_id: CatalogId) -> CardDefinition {
    CardDefinition {
        catalog_id,
        identity: CardIdentity::Joker,
        class: CardClass::Joker,
        sub_class: SubClass::None,
        attack_type: AttackType::Ranged,
        attack_value: 2,
        damage_bonus: 0,
        max_damage_points: 1,
        max_action_points: 0,
        is_character: false,
        special_ability_trigger: true,
        cast_ability: Some(AbilityKind::UberUnblockableDamage {
            base: AbilityKind::JOKER_BASE_DAMAGE,
        }),
        special_ability: Some(AbilityKind::JokerBonusDamage),
        two_action_point_baseline: false,
    }
}

/// The built-in 52-card catalog plus Joker
pub fn standard_catalog() -> Result<Catalog> {
    let mut definitions = Vec::with_capacity(52);
    for rank in Rank::ALL {
        for suit in Suit::ALL {
            let id = CatalogId(definitions.len() as u32);
            definitions.push(Arc::new(standard_definition(id, rank, suit)));
        }
    }
    let joker = Arc::new(joker_definition(CatalogId(definitions.len() as u32)));
    Catalog::new(definitions, joker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = standard_catalog().unwrap();
        assert_eq!(catalog.len(), 52);
        assert_eq!(catalog.deck_size(), 106);

        let characters = catalog
            .definitions()
            .iter()
            .filter(|d| d.is_character)
            .count();
        assert_eq!(characters, 16);

        let traps = catalog.definitions().iter().filter(|d| d.is_trap()).count();
        assert_eq!(traps, 4);
    }

    #[test]
    fn test_unique_cards_resolved_by_identity() {
        let catalog = standard_catalog().unwrap();
        let ace_spades = catalog
            .get(CardIdentity::Standard {
                rank: Rank::Ace,
                suit: Suit::Spades,
            })
            .unwrap();
        assert!(ace_spades.grants_retribution());
        assert!(ace_spades.special_ability_trigger);

        let jack_diamonds = catalog
            .get(CardIdentity::Standard {
                rank: Rank::Jack,
                suit: Suit::Diamonds,
            })
            .unwrap();
        assert_eq!(jack_diamonds.max_action_points, 2);

        let jack_spades = catalog
            .get(CardIdentity::Standard {
                rank: Rank::Jack,
                suit: Suit::Spades,
            })
            .unwrap();
        assert_eq!(jack_spades.max_action_points, 1);
    }

    #[test]
    fn test_red_queens() {
        let catalog = standard_catalog().unwrap();
        let red_queens = catalog
            .definitions()
            .iter()
            .filter(|d| d.is_red_queen())
            .count();
        assert_eq!(red_queens, 2);
    }
}
