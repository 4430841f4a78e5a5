//! Shared helpers for integration tests

#![allow(dead_code)]

use rampart::core::{CardDefinition, CardIdentity, Rank, Suit};
use rampart::game::{GameConfig, GameState};
use rampart::loader::{standard_catalog, Catalog};
use std::sync::Arc;

pub fn catalog() -> Catalog {
    standard_catalog().expect("standard catalog should build")
}

pub fn standard(catalog: &Catalog, rank: Rank, suit: Suit) -> Arc<CardDefinition> {
    Arc::clone(
        catalog
            .get(CardIdentity::Standard { rank, suit })
            .expect("every standard card is in the catalog"),
    )
}

pub fn empty_game() -> GameState {
    GameState::new_empty("Alice", "Bob", GameConfig::default())
}
