//! Core game types and entities

pub mod ability;
pub mod card;
pub mod entity;
pub mod player;
pub mod types;

pub use ability::AbilityKind;
pub use card::{Card, CardDefinition, CardId, CatalogId};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::{Player, PlayerId};
pub use types::{
    AttackType, CardClass, CardIdentity, DamageCategory, DamageSource, PlayerName, Rank, SubClass,
    Suit,
};
