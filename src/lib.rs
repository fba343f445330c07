//! Interval Trainer - a self-hosted work/rest interval timer
//!
//! This library derives the workout phase (pre-delay, work, rest, done) from
//! the timer's run state and the current instant, drives a periodic
//! resampling task while the timer runs, and dispatches audio cues and
//! background media commands whenever the phase changes.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TrainerError;
pub use state::{compute_phase, AppState, Phase, RunState, TimerConfig};
pub use tasks::{ticker_task, Dispatcher};
pub use utils::signals::shutdown_signal;
