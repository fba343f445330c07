//! State management module
//!
//! This module contains the timer's run state, the derived workout phase,
//! the background playlist and the shared application state.

pub mod app_state;
pub mod phase;
pub mod playlist;
pub mod run_state;

// Re-export main types
pub use app_state::{AppState, Snapshot};
pub use phase::{compute_phase, phase_at_second, Phase, TimerConfig};
pub use playlist::{default_tracks, Playlist, Track};
pub use run_state::RunState;
