//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// Bounds for the resample period while the timer runs
pub const MIN_TICK_MS: u64 = 100;
pub const MAX_TICK_MS: u64 = 1000;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "interval-trainer")]
#[command(about = "A self-hosted work/rest interval timer with audio cues")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20530")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Resample period in milliseconds while the timer runs
    #[arg(long, default_value = "250")]
    pub tick_ms: u64,

    /// JSON file holding persisted settings
    #[arg(long, default_value = "interval-trainer.json")]
    pub store_path: PathBuf,

    /// Directory containing the <cue>.wav samples
    #[arg(long, default_value = "cues")]
    pub cue_dir: PathBuf,

    /// Program used to play cue samples (cues are only logged when unset)
    #[arg(long)]
    pub cue_command: Option<String>,

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

    /// Resample period, clamped to a sane range
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }
}
