//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Phase, RunState, Snapshot, TimerConfig, Track};

/// Response for run state transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub run_state: RunState,
    pub phase: Phase,
    pub display: String,
}

impl ApiResponse {
    pub fn new(message: String, snapshot: &Snapshot, config: &TimerConfig) -> Self {
        let status = match snapshot.run_state {
            RunState::Active { .. } => "active",
            RunState::Paused { .. } => "paused",
            RunState::Stopped { .. } => "stopped",
        };

        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            run_state: snapshot.run_state,
            phase: snapshot.phase,
            display: snapshot.phase.describe(config),
        }
    }
}

/// Full timer status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub run_state: RunState,
    pub phase: Phase,
    pub display: String,
    pub toggle_label: String,
    pub timer: TimerConfig,
    pub volume: u8,
    pub track: Option<Track>,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeBody {
    pub volume: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub tracks: Vec<Track>,
    pub selected: usize,
}

/// Error body returned alongside 4xx/5xx codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
