//! Edge-triggered side-effect dispatch
//!
//! Phases are recomputed on every tick, but cues and media commands must only
//! go out when the computed value actually changes.

use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    services::{Cue, CuePlayer, CueRequest, MediaCommand, MediaPlayer},
    state::{Phase, Snapshot, Track},
};

/// Fires once per distinct value
#[derive(Debug, Clone)]
pub struct EdgeTrigger<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> EdgeTrigger<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Record `value`; true when it differs from the previously observed one
    pub fn observe(&mut self, value: &T) -> bool {
        if self.last.as_ref() == Some(value) {
            return false;
        }
        self.last = Some(value.clone());
        true
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<T: PartialEq + Clone> Default for EdgeTrigger<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cues to play on entering `phase`
pub fn cues_for_phase(phase: &Phase) -> Vec<CueRequest> {
    let mut cues = Vec::new();

    match *phase {
        Phase::Inactive => {}
        Phase::PreDelay { elapsed, left } => {
            if elapsed == 0 {
                info!("Pre-delay start");
                cues.push(CueRequest::play(Cue::Start));
            }
            if let Some(cue) = countdown(left) {
                info!("Work in {}", left);
                // the same sample repeats back to back here, restart it
                cues.push(CueRequest::rewind(cue));
            }
        }
        Phase::Work { cycle_index, elapsed, left } => {
            if elapsed == 0 {
                info!("Work start, cycle {}", cycle_index + 1);
                cues.push(CueRequest::play(Cue::Go));
            }
            if let Some(cue) = countdown(left) {
                info!("Rest in {}", left);
                cues.push(CueRequest::play(cue));
            }
        }
        Phase::Rest { cycle_index, elapsed, left } => {
            if elapsed == 0 {
                info!("Rest start, cycle {}", cycle_index + 1);
                cues.push(CueRequest::play(Cue::Rest));
            }
            if let Some(cue) = countdown(left) {
                info!("Work in {}", left);
                cues.push(CueRequest::play(cue));
            }
        }
        Phase::Done => {
            info!("Done");
            cues.push(CueRequest::play(Cue::Done));
        }
    }

    cues
}

fn countdown(left: u64) -> Option<Cue> {
    match left {
        1..=3 => Some(Cue::Count(left as u8)),
        _ => None,
    }
}

/// Owns the cue and media players and feeds them from phase snapshots
pub struct Dispatcher {
    cues: Arc<dyn CuePlayer>,
    media: Arc<dyn MediaPlayer>,
    /// Keyed by run so a restarted workout replays its entry cues
    phase_edge: EdgeTrigger<(u64, Phase)>,
    media_edge: EdgeTrigger<(u64, MediaCommand)>,
}

impl Dispatcher {
    pub fn new(cues: Arc<dyn CuePlayer>, media: Arc<dyn MediaPlayer>) -> Self {
        Self {
            cues,
            media,
            phase_edge: EdgeTrigger::new(),
            media_edge: EdgeTrigger::new(),
        }
    }

    /// Dispatch side effects for a snapshot.
    ///
    /// Returns true when the phase just became `Done` while the timer is
    /// still running or paused, i.e. the caller must complete the run.
    pub fn dispatch(&mut self, snapshot: &Snapshot, track: Option<&Track>, volume: u8) -> bool {
        if let Some(track) = track {
            let command = MediaCommand::derive(&snapshot.run_state, &snapshot.phase, track, volume);
            if self.media_edge.observe(&(snapshot.run_id, command.clone())) {
                self.media.sync(&command);
            }
        }

        if !self.phase_edge.observe(&(snapshot.run_id, snapshot.phase)) {
            return false;
        }

        debug!("Phase changed to {:?}", snapshot.phase);
        for request in cues_for_phase(&snapshot.phase) {
            self.cues.play(request);
        }

        snapshot.phase.is_done() && !snapshot.run_state.is_stopped()
    }
}
