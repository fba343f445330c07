//! Run state of the timer and its transitions

use serde::{Deserialize, Serialize};

/// Timer run state, independent of the derived phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No timer running; `done` is set when the last workout completed
    Stopped { done: bool },
    /// Running since `start_ms`
    Active { start_ms: u64 },
    /// Frozen with exactly `accumulated_ms` of workout time behind it
    Paused { accumulated_ms: u64 },
}

impl RunState {
    pub fn new() -> Self {
        RunState::Stopped { done: false }
    }

    /// Start, pause or resume depending on the current state
    pub fn toggle(self, now_ms: u64) -> Self {
        match self {
            RunState::Stopped { .. } => RunState::Active { start_ms: now_ms },
            RunState::Active { start_ms } => {
                debug_assert!(now_ms >= start_ms, "clock is behind the start instant");
                RunState::Paused {
                    accumulated_ms: now_ms.saturating_sub(start_ms),
                }
            }
            // Re-anchor the origin so elapsed time stays exact across pauses
            RunState::Paused { accumulated_ms } => RunState::Active {
                start_ms: now_ms.saturating_sub(accumulated_ms),
            },
        }
    }

    pub fn reset(self) -> Self {
        RunState::Stopped { done: false }
    }

    /// Mark the workout complete. Only a running or paused timer can complete.
    pub fn complete(self) -> Option<Self> {
        match self {
            RunState::Active { .. } | RunState::Paused { .. } => {
                Some(RunState::Stopped { done: true })
            }
            RunState::Stopped { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Active { .. })
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, RunState::Paused { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, RunState::Stopped { .. })
    }

    /// Label for the start/pause control
    pub fn toggle_label(&self) -> &'static str {
        if self.is_active() { "Pause" } else { "Start" }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
