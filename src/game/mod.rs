//! Game state, round structure and resolution

pub mod abilities;
pub mod asp;
pub mod combat;
pub mod config;
pub mod controller;
pub mod events;
pub mod interactive_controller;
pub mod logger;
pub mod phase;
pub mod random_controller;
pub mod round;
pub mod scripted_controller;
pub mod state;
pub mod zero_controller;

pub use abilities::AbilityOutcome;
pub use asp::{ActionSequencePile, AspEntry};
pub use combat::{AttackKind, AttackOutcome};
pub use config::GameConfig;
pub use controller::{
    ChoiceOption, Constraint, DecisionProvider, DecisionRequest, GameStateView, PromptKind, Seats,
    Selection,
};
pub use events::{EventSink, GameEvent, NullSink};
pub use interactive_controller::InteractiveController;
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode};
pub use phase::{Phase, RoundStructure};
pub use random_controller::RandomController;
pub use round::{GameEndReason, GameResult, RoundManager, VerbosityLevel};
pub use scripted_controller::{ScriptStep, ScriptedController};
pub use state::{DamageOutcome, GameState};
pub use zero_controller::ZeroController;
