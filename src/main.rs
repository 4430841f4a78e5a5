//! Rampart - Main Binary
//!
//! Plays the card game in the terminal, or runs batches of simulated games

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rampart::{
    core::PlayerId,
    deck::SeededShuffle,
    game::{
        DecisionProvider, GameConfig, GameLogger, GameState, InteractiveController, OutputFormat,
        RandomController, RoundManager, ScriptedController, VerbosityLevel, ZeroController,
    },
    loader::{standard_catalog, CatalogLoader},
    simulation,
};
use std::path::PathBuf;

/// Controller type for each seat
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always chooses the first option (for testing)
    Zero,
    /// Makes random choices
    Random,
    /// Fixed script of choices (requires --pN-fixed-inputs)
    Scripted,
    /// Text UI controller for human play via stdin
    Tui,
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Parser)]
#[command(name = "rampart")]
#[command(about = "Rampart - wall and battlement card game engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(PlayArgs),

    /// Run many seeded random-vs-random games in parallel
    Simulate {
        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Base seed; game i uses a seed derived from it
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Args)]
struct PlayArgs {
    /// Player 1 controller type
    #[arg(long, value_enum, default_value = "random")]
    p1: ControllerType,

    /// Player 2 controller type
    #[arg(long, value_enum, default_value = "random")]
    p2: ControllerType,

    /// Player 1 name
    #[arg(long, default_value = "Player 1")]
    p1_name: String,

    /// Player 2 name
    #[arg(long, default_value = "Player 2")]
    p2_name: String,

    /// Fixed script input for player 1 (space or comma separated indices, e.g., "1 1 2" or "1,1,2")
    #[arg(long, value_name = "CHOICES")]
    p1_fixed_inputs: Option<String>,

    /// Fixed script input for player 2 (space or comma separated indices, e.g., "1 1 2" or "1,1,2")
    #[arg(long, value_name = "CHOICES")]
    p2_fixed_inputs: Option<String>,

    /// Set random seed for deterministic games
    #[arg(long)]
    seed: Option<u64>,

    /// Card catalog CSV (default: built-in standard catalog)
    #[arg(long, value_name = "CSV")]
    catalog: Option<PathBuf>,

    /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
    #[arg(long, default_value = "normal", short = 'v')]
    verbosity: VerbosityArg,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,

    /// Stop and score the game after this many rounds
    #[arg(long)]
    max_rounds: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => run_play(args)?,
        Commands::Simulate { games, seed } => run_simulate(games, seed)?,
    }

    Ok(())
}

/// Parse fixed input string into a vector of choice indices
fn parse_fixed_inputs(input: &str) -> std::result::Result<Vec<usize>, String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("invalid choice index: '{}'", s))
        })
        .collect()
}

fn make_controller(
    kind: ControllerType,
    player: PlayerId,
    seed: Option<u64>,
    fixed_inputs: Option<&str>,
) -> anyhow::Result<Box<dyn DecisionProvider>> {
    Ok(match kind {
        ControllerType::Zero => Box::new(ZeroController::new(player)),
        ControllerType::Random => match seed {
            Some(seed) => Box::new(RandomController::with_seed(player, seed)),
            None => Box::new(RandomController::new(player)),
        },
        ControllerType::Scripted => {
            let Some(inputs) = fixed_inputs else {
                bail!("scripted controller for player {player} needs --p{}-fixed-inputs", player.as_u32() + 1);
            };
            let script = parse_fixed_inputs(inputs).map_err(anyhow::Error::msg)?;
            Box::new(ScriptedController::new(player, script))
        }
        ControllerType::Tui => Box::new(InteractiveController::new(player)),
    })
}

fn run_play(args: PlayArgs) -> anyhow::Result<()> {
    let catalog = match &args.catalog {
        Some(path) => CatalogLoader::load_from_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => standard_catalog()?,
    };

    let mut config = GameConfig::default();
    if let Some(max_rounds) = args.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }
    let mut shuffler = match args.seed {
        Some(seed) => {
            config = config.with_seed(seed);
            SeededShuffle::new(seed)
        }
        None => SeededShuffle::from_entropy(),
    };

    let mut game = GameState::new_two_player(
        args.p1_name.as_str(),
        args.p2_name.as_str(),
        &catalog,
        config,
        &mut shuffler,
    );
    let [p1, p2] = game.player_ids();

    // Controllers get their own streams so shuffles and choices don't interfere
    let mut controller1 = make_controller(
        args.p1,
        p1,
        args.seed.map(|s| s.wrapping_add(1)),
        args.p1_fixed_inputs.as_deref(),
    )?;
    let mut controller2 = make_controller(
        args.p2,
        p2,
        args.seed.map(|s| s.wrapping_add(2)),
        args.p2_fixed_inputs.as_deref(),
    )?;

    let verbosity: VerbosityLevel = args.verbosity.into();
    let mut logger = GameLogger::with_verbosity(verbosity);
    if args.json {
        logger.set_output_format(OutputFormat::Json);
    }

    let result = RoundManager::new(&mut game).run_game(
        controller1.as_mut(),
        controller2.as_mut(),
        &mut logger,
    )?;

    if !args.json && verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Game Over ===");
        match result.winner {
            Some(winner) => println!("Winner: {}", game.get_player(winner)?.name),
            None => println!("Draw"),
        }
        println!("Rounds played: {}", result.rounds_played);
        println!("Reason: {:?}", result.end_reason);
        for (player, score) in &result.scores {
            println!("  {}: {}", game.get_player(*player)?.name, score);
        }
    }

    Ok(())
}

fn run_simulate(games: usize, seed: u64) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let summary = simulation::run_batch(games, seed)?;
    let elapsed = start.elapsed();

    println!("=== Simulation: {games} games (seed {seed}) ===");
    println!("Player 1 wins: {}", summary.p1_wins);
    println!("Player 2 wins: {}", summary.p2_wins);
    println!("Draws:         {}", summary.draws);
    println!("Failed:        {}", summary.failures);
    println!("Average rounds: {:.1}", summary.average_rounds);
    println!(
        "Elapsed: {:.2}s ({:.0} games/sec)",
        elapsed.as_secs_f64(),
        games as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    Ok(())
}
