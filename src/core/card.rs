//! Card definitions and card instances

use crate::core::{
    AbilityKind, AttackType, CardClass, CardIdentity, DamageCategory, DamageSource, EntityId,
    GameEntity, PlayerId, Rank, SubClass,
};
use crate::error::Precondition;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

pub type CardId = EntityId<Card>;

/// Stable index of a row in the card catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogId(pub u32);

/// Immutable, catalog-derived attributes shared by every copy of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub catalog_id: CatalogId,
    pub identity: CardIdentity,
    pub class: CardClass,
    pub sub_class: SubClass,
    pub attack_type: AttackType,
    pub attack_value: u32,
    pub damage_bonus: u32,
    pub max_damage_points: u32,
    /// Round baseline: 2 for two-eyed characters, 1 for other characters, 0 otherwise
    pub max_action_points: u32,
    pub is_character: bool,
    pub special_ability_trigger: bool,
    /// Effect when revealed from the action sequence pile
    pub cast_ability: Option<AbilityKind>,
    /// Effect when the card enters play
    pub special_ability: Option<AbilityKind>,
    pub two_action_point_baseline: bool,
}

impl CardDefinition {
    /// Round baseline implied by the capability flags
    pub fn baseline_for(is_character: bool, two_action_point_baseline: bool) -> u32 {
        match (is_character, two_action_point_baseline) {
            (true, true) => 2,
            (true, false) => 1,
            (false, _) => 0,
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        self.identity.rank()
    }

    pub fn is_trap(&self) -> bool {
        self.rank() == Some(Rank::TRAP)
    }

    pub fn is_joker(&self) -> bool {
        self.identity.is_joker()
    }

    pub fn is_red_queen(&self) -> bool {
        matches!(
            self.identity,
            CardIdentity::Standard { rank: Rank::Queen, suit } if suit.is_red()
        )
    }

    /// Hand-card resource category (Ammo/Magic) this card provides
    pub fn resource(&self) -> Option<DamageSource> {
        self.cast_ability.as_ref().and_then(AbilityKind::resource)
    }

    pub fn can_block(&self) -> bool {
        self.cast_ability
            .as_ref()
            .is_some_and(AbilityKind::can_block)
    }

    pub fn grants_retribution(&self) -> bool {
        matches!(
            self.special_ability,
            Some(AbilityKind::RetributionOnMeleeHit)
        )
    }

    /// Melee and ranged attack damage
    pub fn attack_damage(&self) -> u32 {
        self.attack_value + self.damage_bonus
    }
}

/// A card instance during play
///
/// Many instances share one definition (every catalog row is doubled in a
/// deck). The mutable combat state lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner: PlayerId,
    pub definition: Arc<CardDefinition>,

    /// Current damage points, never below zero
    pub damage_points: u32,
    pub action_points: u32,
    pub face_down: bool,
    pub destroyed: bool,

    /// Landed a melee hit while in play (retribution target)
    pub has_attacked: bool,

    /// Damage categories this instance ignores
    pub immunities: SmallVec<[DamageCategory; 2]>,
}

impl Card {
    pub fn new(id: CardId, owner: PlayerId, definition: Arc<CardDefinition>) -> Self {
        Card {
            id,
            owner,
            damage_points: definition.max_damage_points,
            action_points: definition.max_action_points,
            definition,
            face_down: true,
            destroyed: false,
            has_attacked: false,
            immunities: SmallVec::new(),
        }
    }

    pub fn is_character(&self) -> bool {
        self.definition.is_character
    }

    pub fn rank(&self) -> Option<Rank> {
        self.definition.rank()
    }

    pub fn is_trap(&self) -> bool {
        self.definition.is_trap()
    }

    /// Subtract damage, clamped at zero
    ///
    /// Returns true exactly once: on the first transition to zero.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if self.destroyed {
            return false;
        }
        self.damage_points = self.damage_points.saturating_sub(amount);
        if self.damage_points == 0 {
            self.destroyed = true;
            return true;
        }
        false
    }

    pub fn spend_action_point(&mut self) -> Result<(), Precondition> {
        if self.action_points == 0 {
            return Err(Precondition::InsufficientResource(self.id));
        }
        self.action_points -= 1;
        Ok(())
    }

    pub fn reset_for_round(&mut self) {
        self.action_points = self.definition.max_action_points;
    }

    pub fn flip(&mut self) {
        self.face_down = !self.face_down;
    }

    pub fn is_immune_to(&self, category: DamageCategory) -> bool {
        category != DamageCategory::Uber && self.immunities.contains(&category)
    }

    pub fn grant_immunity(&mut self, categories: &[DamageCategory]) {
        for category in categories {
            if !self.immunities.contains(category) {
                self.immunities.push(*category);
            }
        }
    }

    /// Clear play-only state when the card leaves the battlement/field zones
    pub fn leave_play(&mut self) {
        self.has_attacked = false;
        self.immunities.clear();
    }

    /// Restore catalog values for a card coming back out of the discard pile
    pub fn revive(&mut self) {
        self.damage_points = self.definition.max_damage_points;
        self.action_points = self.definition.max_action_points;
        self.destroyed = false;
        self.leave_play();
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> String {
        self.definition.identity.to_string()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.definition.identity, self.id)
    }
}
