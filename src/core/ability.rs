//! Closed ability taxonomy
//!
//! Catalog text is classified into one of these variants once, at load
//! time. The resolvers dispatch on the tag and never look at text again.

use crate::core::{DamageCategory, DamageSource};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// The card ignores damage of the listed categories
    InvulnerabilityGrant {
        categories: SmallVec<[DamageCategory; 2]>,
    },
    /// On entering play, destroys opposing field cards that landed a melee hit
    RetributionOnMeleeHit,
    /// The controller picks who draws two cards
    DrawTwoCards,
    AmmoRangedDamage(u32),
    MagicRangedOrBlock(u32),
    /// Blocks from hand, or deals the card's attack value when revealed
    ArmorBlockOrDamage,
    InstantBlock,
    /// Unblockable damage: base plus one per voluntarily spent action point
    UberUnblockableDamage { base: u32 },
    /// Joker catalog text for the per action point bonus
    ///
    /// The bonus is applied while the Joker's uber cast resolves; the Joker
    /// never enters play, so nothing triggers this on its own.
    JokerBonusDamage,
}

impl AbilityKind {
    /// Base damage for Joker resolution
    pub const JOKER_BASE_DAMAGE: u32 = 2;

    pub fn magic_ranged_immunity() -> Self {
        let mut categories = SmallVec::new();
        categories.push(DamageCategory::Ranged);
        categories.push(DamageCategory::Magic);
        AbilityKind::InvulnerabilityGrant { categories }
    }

    /// Can a card carrying this ability be spent from hand as a block?
    pub fn can_block(&self) -> bool {
        matches!(
            self,
            AbilityKind::InstantBlock
                | AbilityKind::ArmorBlockOrDamage
                | AbilityKind::MagicRangedOrBlock(_)
        )
    }

    /// Resource category this ability makes a hand card count as
    pub fn resource(&self) -> Option<DamageSource> {
        match self {
            AbilityKind::AmmoRangedDamage(_) => Some(DamageSource::Ammo),
            AbilityKind::MagicRangedOrBlock(_) => Some(DamageSource::Magic),
            _ => None,
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityKind::InvulnerabilityGrant { categories } => {
                write!(f, "Invulnerable to {categories:?}")
            }
            AbilityKind::RetributionOnMeleeHit => f.write_str("Retribution"),
            AbilityKind::DrawTwoCards => f.write_str("Draw two cards"),
            AbilityKind::AmmoRangedDamage(n) => write!(f, "Ammo: {n} ranged damage"),
            AbilityKind::MagicRangedOrBlock(n) => write!(f, "Magic: {n} damage or block"),
            AbilityKind::ArmorBlockOrDamage => f.write_str("Armor block or damage"),
            AbilityKind::InstantBlock => f.write_str("Instant block"),
            AbilityKind::UberUnblockableDamage { base } => write!(f, "Uber damage {base}+"),
            AbilityKind::JokerBonusDamage => f.write_str("Joker bonus damage"),
        }
    }
}
