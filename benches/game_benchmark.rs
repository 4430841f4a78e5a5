//! Performance benchmarks for the Rampart engine
//!
//! Measures full random-vs-random games with Criterion.rs in two modes:
//!
//! 1. **Fresh** - build and shuffle a new game for each iteration
//! 2. **Snapshot** - clone a pre-built starting state each iteration
//!
//! A third group times batch simulation, which fans games out over rayon.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rampart::{
    deck::SeededShuffle,
    game::{GameConfig, GameResult, GameState, NullSink, RandomController, RoundManager},
    loader::{standard_catalog, Catalog},
    simulation, Result,
};
use std::time::{Duration, Instant};

/// Metrics collected during game execution
#[derive(Debug, Clone)]
struct GameMetrics {
    rounds: u32,
    duration: Duration,
}

impl GameMetrics {
    fn games_per_sec(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    fn rounds_per_sec(&self) -> f64 {
        self.rounds as f64 / self.duration.as_secs_f64()
    }
}

fn new_game(catalog: &Catalog, seed: u64) -> GameState {
    let mut shuffler = SeededShuffle::new(seed);
    GameState::new_two_player(
        "Player 1",
        "Player 2",
        catalog,
        GameConfig::default().with_seed(seed),
        &mut shuffler,
    )
}

fn play(game: &mut GameState, seed: u64) -> Result<GameResult> {
    let [p1, p2] = game.player_ids();
    let mut controller1 = RandomController::with_seed(p1, seed);
    let mut controller2 = RandomController::with_seed(p2, seed + 1);
    RoundManager::new(game).run_game(&mut controller1, &mut controller2, &mut NullSink)
}

fn run_game_with_metrics(catalog: &Catalog, seed: u64) -> Result<GameMetrics> {
    let start = Instant::now();
    let mut game = new_game(catalog, seed);
    let result = play(&mut game, seed)?;
    Ok(GameMetrics {
        rounds: result.rounds_played,
        duration: start.elapsed(),
    })
}

/// Benchmark: Fresh mode - allocate new game each iteration
fn bench_game_fresh(c: &mut Criterion) {
    let catalog = match standard_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to build catalog: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    println!("\nWarmup game (seed {}):", seed);
    if let Ok(metrics) = run_game_with_metrics(&catalog, seed) {
        println!("  Rounds: {}", metrics.rounds);
        println!("  Duration: {:?}", metrics.duration);
        println!("  Games/sec: {:.2}", metrics.games_per_sec());
        println!("  Rounds/sec: {:.2}", metrics.rounds_per_sec());
    }

    group.bench_with_input(BenchmarkId::new("fresh", seed), &seed, |b, &seed| {
        b.iter(|| run_game_with_metrics(&catalog, black_box(seed)).expect("game should complete"));
    });

    group.finish();
}

/// Benchmark: Snapshot mode - clone the shuffled starting state each iteration
fn bench_game_snapshot(c: &mut Criterion) {
    let catalog = match standard_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Skipping benchmark - failed to build catalog: {}", e);
            return;
        }
    };

    let mut group = c.benchmark_group("game_execution");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    let seed = 42u64;
    let initial_game = new_game(&catalog, seed);

    group.bench_function(BenchmarkId::new("snapshot", seed), |b| {
        b.iter(|| {
            let mut game = initial_game.clone();
            play(&mut game, black_box(seed)).expect("game should complete")
        });
    });

    group.finish();
}

/// Benchmark: parallel batch of games
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation");
    group.sample_size(10);

    for games in [16usize, 64] {
        group.bench_with_input(BenchmarkId::new("batch", games), &games, |b, &games| {
            b.iter(|| simulation::run_batch(black_box(games), 7).expect("batch should run"));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_game_fresh, bench_game_snapshot, bench_batch);
criterion_main!(benches);
