//! Workout phase derivation
//!
//! The phase is never stored. It is recomputed from the run state and the
//! current instant every time it is needed.

use serde::{Deserialize, Serialize};

use super::RunState;

/// Fixed workout shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub pre_delay_secs: u64,
    pub work_secs: u64,
    pub rest_secs: u64,
    pub cycle_count: u64,
}

impl TimerConfig {
    /// Length of one work+rest pair in seconds
    pub fn cycle_secs(&self) -> u64 {
        self.work_secs + self.rest_secs
    }

    /// Total workout length, the last cycle has no trailing rest
    pub fn total_secs(&self) -> u64 {
        self.pre_delay_secs + self.cycle_count * self.cycle_secs() - self.rest_secs
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            pre_delay_secs: 10,
            work_secs: 20,
            rest_secs: 10,
            cycle_count: 8,
        }
    }
}

/// Discrete interval of the workout at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    Inactive,
    PreDelay { elapsed: u64, left: u64 },
    Work { cycle_index: u64, elapsed: u64, left: u64 },
    Rest { cycle_index: u64, elapsed: u64, left: u64 },
    Done,
}

impl Phase {
    /// Seconds remaining in the current interval, if it is a timed one
    pub fn left(&self) -> Option<u64> {
        match *self {
            Phase::PreDelay { left, .. } | Phase::Work { left, .. } | Phase::Rest { left, .. } => {
                Some(left)
            }
            Phase::Inactive | Phase::Done => None,
        }
    }

    /// Seconds spent in the current interval, if it is a timed one
    pub fn elapsed(&self) -> Option<u64> {
        match *self {
            Phase::PreDelay { elapsed, .. }
            | Phase::Work { elapsed, .. }
            | Phase::Rest { elapsed, .. } => Some(elapsed),
            Phase::Inactive | Phase::Done => None,
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self, Phase::Work { .. })
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Phase::Done)
    }

    /// Human readable status line
    pub fn describe(&self, config: &TimerConfig) -> String {
        match *self {
            Phase::Inactive => "--".to_string(),
            Phase::PreDelay { left, .. } => format!("Get ready: {} seconds", left),
            Phase::Work { cycle_index, left, .. } => format!(
                "Cycle {}/{}: work {} seconds",
                cycle_index + 1,
                config.cycle_count,
                left
            ),
            Phase::Rest { cycle_index, left, .. } => format!(
                "Cycle {}/{}: rest {} seconds",
                cycle_index + 1,
                config.cycle_count,
                left
            ),
            Phase::Done => "Done!".to_string(),
        }
    }
}

/// Derive the phase for `state` at instant `now_ms`
pub fn compute_phase(config: &TimerConfig, state: &RunState, now_ms: u64) -> Phase {
    let elapsed_ms = match *state {
        RunState::Stopped { done: false } => return Phase::Inactive,
        RunState::Stopped { done: true } => return Phase::Done,
        RunState::Active { start_ms } => {
            debug_assert!(now_ms >= start_ms, "clock is behind the start instant");
            // an impossible instant reads as a stopped timer
            if now_ms < start_ms {
                return Phase::Inactive;
            }
            now_ms - start_ms
        }
        RunState::Paused { accumulated_ms } => accumulated_ms,
    };

    phase_at_second(config, elapsed_ms / 1000)
}

/// Derive the phase for a whole number of elapsed seconds
pub fn phase_at_second(config: &TimerConfig, seconds: u64) -> Phase {
    if seconds < config.pre_delay_secs {
        return Phase::PreDelay {
            elapsed: seconds,
            left: config.pre_delay_secs - seconds,
        };
    }

    let cycle_time = seconds - config.pre_delay_secs;
    let cycle_index = cycle_time / config.cycle_secs();
    if cycle_index >= config.cycle_count {
        return Phase::Done;
    }

    let cycle_elapsed = cycle_time - cycle_index * config.cycle_secs();
    if cycle_elapsed < config.work_secs {
        return Phase::Work {
            cycle_index,
            elapsed: cycle_elapsed,
            left: config.work_secs - cycle_elapsed,
        };
    }

    // no rest after the final cycle
    if cycle_index == config.cycle_count - 1 {
        return Phase::Done;
    }

    let rest_elapsed = cycle_elapsed - config.work_secs;
    Phase::Rest {
        cycle_index,
        elapsed: rest_elapsed,
        left: config.rest_secs - rest_elapsed,
    }
}
