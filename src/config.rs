//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::{
    services::AlertCommand,
    state::{timer_state, PresetId, TimerState},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "egg-o-matic")]
#[command(about = "An egg cooking battle timer served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Preset selected at startup (soft, jammy, hard, custom)
    #[arg(long, default_value = "soft")]
    pub preset: PresetId,

    /// Initial custom duration, minutes part
    #[arg(long, default_value_t = timer_state::DEFAULT_CUSTOM_MINUTES)]
    pub custom_minutes: u64,

    /// Initial custom duration, seconds part (clamped to 59)
    #[arg(long, default_value_t = timer_state::DEFAULT_CUSTOM_SECONDS)]
    pub custom_seconds: u64,

    /// Length of one countdown tick in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Seconds between flavor quote rotations
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub quote_interval_secs: u64,

    /// Command run when a countdown completes; rings the terminal bell when unset
    #[arg(long)]
    pub alert_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn quote_period(&self) -> Duration {
        Duration::from_secs(self.quote_interval_secs)
    }

    /// Timer state the application starts with
    pub fn initial_timer(&self) -> TimerState {
        TimerState::with_defaults(self.preset, self.custom_minutes, self.custom_seconds)
    }

    pub fn alert(&self) -> Result<AlertCommand, String> {
        match &self.alert_command {
            Some(line) => AlertCommand::from_command_line(line),
            None => Ok(AlertCommand::Bell),
        }
    }
}
