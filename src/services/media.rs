//! Background media synchronisation

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::{Phase, RunState, Track};

/// Share of the configured volume used outside of work intervals
pub const DUCKED_VOLUME_RATIO: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayState {
    Active,
    Paused,
    Stopped,
}

/// Desired state of the external media player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCommand {
    pub track_id: String,
    pub start_offset_secs: u32,
    pub play_state: PlayState,
    pub volume: u8,
}

impl MediaCommand {
    /// Derive the player command for a run state, phase and selected track
    pub fn derive(run_state: &RunState, phase: &Phase, track: &Track, volume: u8) -> Self {
        let play_state = match run_state {
            RunState::Active { .. } => PlayState::Active,
            RunState::Paused { .. } => PlayState::Paused,
            RunState::Stopped { .. } => PlayState::Stopped,
        };

        Self {
            track_id: track.id.clone(),
            start_offset_secs: track.start_offset_secs,
            play_state,
            volume: if phase.is_work() { volume } else { ducked(volume) },
        }
    }
}

fn ducked(volume: u8) -> u8 {
    (volume as f32 * DUCKED_VOLUME_RATIO).round() as u8
}

/// Drives an external video/audio player. Fire-and-forget.
pub trait MediaPlayer: Send + Sync {
    fn sync(&self, command: &MediaCommand);
}

/// Media player that logs the commands it receives
#[derive(Debug, Default)]
pub struct LogMediaPlayer;

impl MediaPlayer for LogMediaPlayer {
    fn sync(&self, command: &MediaCommand) {
        info!(
            "Media: track={} offset={}s state={:?} volume={}",
            command.track_id, command.start_offset_secs, command.play_state, command.volume
        );
    }
}
