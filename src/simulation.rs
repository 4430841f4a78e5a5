//! Batch simulation of random-vs-random games
//!
//! Games are independent, so they run in parallel with rayon. Game `i`
//! derives every seed it needs from `base_seed + i`, which keeps a batch
//! reproducible regardless of thread scheduling.

use crate::core::PlayerId;
use crate::deck::SeededShuffle;
use crate::game::{GameConfig, GameResult, GameState, NullSink, RandomController, RoundManager};
use crate::loader::{standard_catalog, Catalog};
use crate::Result;
use rayon::prelude::*;
use serde::Serialize;

/// Aggregate statistics over a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub games: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Games that stopped on an engine error
    pub failures: usize,
    /// Mean rounds over completed games
    pub average_rounds: f64,
}

/// Play one seeded game between two random controllers
pub fn play_seeded(catalog: &Catalog, seed: u64) -> Result<GameResult> {
    let config = GameConfig::default().with_seed(seed);
    let mut shuffler = SeededShuffle::new(seed);
    let mut game = GameState::new_two_player("Player 1", "Player 2", catalog, config, &mut shuffler);
    let [p1, p2] = game.player_ids();

    let mut controller1 = RandomController::with_seed(p1, seed.wrapping_add(1));
    let mut controller2 = RandomController::with_seed(p2, seed.wrapping_add(2));
    let mut sink = NullSink;

    RoundManager::new(&mut game).run_game(&mut controller1, &mut controller2, &mut sink)
}

/// Run `games` games in parallel and summarise them
pub fn run_batch(games: usize, base_seed: u64) -> Result<BatchSummary> {
    let catalog = standard_catalog()?;

    let results: Vec<Option<GameResult>> = (0..games)
        .into_par_iter()
        .map(|idx| play_seeded(&catalog, base_seed.wrapping_add(idx as u64)).ok())
        .collect();

    Ok(summarise(&results))
}

fn summarise(results: &[Option<GameResult>]) -> BatchSummary {
    let p1 = PlayerId::new(0);
    let p2 = PlayerId::new(1);
    let mut summary = BatchSummary {
        games: results.len(),
        p1_wins: 0,
        p2_wins: 0,
        draws: 0,
        failures: 0,
        average_rounds: 0.0,
    };
    let mut total_rounds = 0u64;

    for result in results {
        let Some(result) = result else {
            summary.failures += 1;
            continue;
        };
        total_rounds += u64::from(result.rounds_played);
        match result.winner {
            Some(winner) if winner == p1 => summary.p1_wins += 1,
            Some(winner) if winner == p2 => summary.p2_wins += 1,
            _ => summary.draws += 1,
        }
    }

    let completed = summary.games - summary.failures;
    if completed > 0 {
        summary.average_rounds = total_rounds as f64 / completed as f64;
    }
    summary
}
