//! Event logger
//!
//! [`GameLogger`] is the stock [`EventSink`]: it renders events as text or
//! JSON lines, filtered by verbosity, to stdout and/or an in-memory buffer.

use crate::game::events::{EventSink, GameEvent};
use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g., "game_event")
    pub category: Option<String>,
}

/// Verbosity an event is reported at
pub fn event_level(event: &GameEvent) -> VerbosityLevel {
    match event {
        GameEvent::GameEnded { .. } => VerbosityLevel::Minimal,
        GameEvent::GameStarted { .. }
        | GameEvent::RoundStarted { .. }
        | GameEvent::PhaseEntered { .. }
        | GameEvent::CardDestroyed { .. }
        | GameEvent::AttackDeclared { .. }
        | GameEvent::AbilityResolved { .. }
        | GameEvent::TrapTriggered { .. } => VerbosityLevel::Normal,
        _ => VerbosityLevel::Verbose,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    #[serde(skip)]
    log_buffer: Vec<LogEntry>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            ..Self::default()
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Captured log entries
    pub fn logs(&self) -> &[LogEntry] {
        &self.log_buffer
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.clear();
    }

    fn log_to_stdout(level: VerbosityLevel, message: &str) {
        if level == VerbosityLevel::Minimal {
            println!("{}", message);
        } else {
            println!("  {}", message);
        }
    }

    fn log(&mut self, level: VerbosityLevel, message: String, category: &str) {
        let should_capture = matches!(self.output_mode, OutputMode::Memory | OutputMode::Both);
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        if should_output && level <= self.verbosity {
            Self::log_to_stdout(level, &message);
        }
        if should_capture {
            self.log_buffer.push(LogEntry {
                level,
                message,
                category: Some(category.to_string()),
            });
        }
    }

    fn render(&self, event: &GameEvent) -> String {
        match self.output_format {
            OutputFormat::Text => event.to_string(),
            OutputFormat::Json => {
                serde_json::to_string(event).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
            }
        }
    }
}

impl EventSink for GameLogger {
    fn emit(&mut self, event: &GameEvent) {
        let level = event_level(event);
        // Nothing to do when it would be neither printed nor captured
        if level > self.verbosity && !self.is_capturing() {
            return;
        }
        let message = self.render(event);
        self.log(level, message, "game_event");
    }
}
