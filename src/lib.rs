//! Rampart - rules engine for a two-player wall and battlement card game
//!
//! Cards live in per-player zones (hand, wall, battlement, field, discard)
//! and a shared action sequence pile. Rounds run through a fixed phase
//! cycle; every choice is asked of a [`game::DecisionProvider`] and every
//! state change is reported to a [`game::EventSink`].

pub mod core;
pub mod deck;
pub mod error;
pub mod game;
pub mod loader;
pub mod simulation;
pub mod zones;

pub use error::{RampartError, Result};
