//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{compute_phase, Phase, Playlist, RunState, TimerConfig, Track};
use crate::{
    error::{Result, TrainerError},
    services::{Clock, VolumeStore},
};

/// Run state, instant and phase taken under one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Bumped every time the timer starts from stopped
    pub run_id: u64,
    pub run_state: RunState,
    pub now_ms: u64,
    pub phase: Phase,
}

/// Current run state and the identity of the run it belongs to
#[derive(Debug, Clone, Copy)]
struct Run {
    id: u64,
    state: RunState,
}

/// Main application state shared by the API and the ticker task
pub struct AppState {
    /// Workout shape and resample period
    pub timer: TimerConfig,
    pub tick_interval: Duration,
    clock: Arc<dyn Clock>,
    run: Mutex<Run>,
    playlist: Mutex<Playlist>,
    volume: Mutex<u8>,
    store: Mutex<VolumeStore>,
    /// Server metadata
    pub start_time: Instant,
    last_action: Mutex<Option<(String, DateTime<Utc>)>>,
    /// Publishes every run state transition and settings change
    changes_tx: watch::Sender<RunState>,
    /// Keep the receiver alive to prevent channel closure
    _changes_rx: watch::Receiver<RunState>,
}

impl AppState {
    pub fn new(
        timer: TimerConfig,
        tick_interval: Duration,
        clock: Arc<dyn Clock>,
        playlist: Playlist,
        store: VolumeStore,
        volume: u8,
    ) -> Self {
        let (changes_tx, changes_rx) = watch::channel(RunState::new());

        Self {
            timer,
            tick_interval,
            clock,
            run: Mutex::new(Run { id: 0, state: RunState::new() }),
            playlist: Mutex::new(playlist),
            volume: Mutex::new(volume),
            store: Mutex::new(store),
            start_time: Instant::now(),
            last_action: Mutex::new(None),
            changes_tx,
            _changes_rx: changes_rx,
        }
    }

    /// Apply a run state transition and notify the scheduler
    fn transition<F>(&self, action: &str, f: F) -> Result<RunState>
    where
        F: FnOnce(RunState, u64) -> RunState,
    {
        let mut run = self.run.lock()
            .map_err(|_| TrainerError::Lock("run state"))?;

        let now_ms = self.clock.now_ms();
        let new_state = f(run.state, now_ms);
        if run.state.is_stopped() && new_state.is_active() {
            run.id += 1;
        }
        run.state = new_state;
        drop(run);

        info!("{}: now {:?}", action, new_state);
        self.record_action(action);
        self.changes_tx.send_replace(new_state);

        Ok(new_state)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last) = self.last_action.lock() {
            *last = Some((action.to_string(), Utc::now()));
        }
    }

    /// Start, pause or resume
    pub fn toggle(&self) -> Result<RunState> {
        self.transition("toggle", |state, now| state.toggle(now))
    }

    /// Stop and forget any progress
    pub fn reset(&self) -> Result<RunState> {
        self.transition("reset", |state, _| state.reset())
    }

    /// Mark the workout finished. Returns `None` when the timer was already stopped.
    pub fn complete(&self) -> Result<Option<RunState>> {
        let mut run = self.run.lock()
            .map_err(|_| TrainerError::Lock("run state"))?;

        let Some(new_state) = run.state.complete() else {
            return Ok(None);
        };
        run.state = new_state;
        drop(run);

        info!("Workout complete");
        self.record_action("complete");
        self.changes_tx.send_replace(new_state);
        Ok(Some(new_state))
    }

    pub fn get_run_state(&self) -> Result<RunState> {
        self.run.lock()
            .map(|run| run.state)
            .map_err(|_| TrainerError::Lock("run state"))
    }

    /// Sample the clock and derive the phase from a consistent view
    pub fn snapshot(&self) -> Result<Snapshot> {
        let run = self.run.lock()
            .map_err(|_| TrainerError::Lock("run state"))?;

        let now_ms = self.clock.now_ms();
        Ok(Snapshot {
            run_id: run.id,
            run_state: run.state,
            now_ms,
            phase: compute_phase(&self.timer, &run.state, now_ms),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.changes_tx.subscribe()
    }

    /// Re-publish the current run state so listeners re-evaluate side effects
    fn notify_settings_changed(&self) -> Result<()> {
        let current = self.get_run_state()?;
        self.changes_tx.send_replace(current);
        Ok(())
    }

    pub fn get_volume(&self) -> Result<u8> {
        self.volume.lock()
            .map(|v| *v)
            .map_err(|_| TrainerError::Lock("volume"))
    }

    /// Update the volume and persist it. Storage failures are logged only.
    ///
    /// Writes the store file synchronously; call from a blocking context.
    pub fn set_volume(&self, volume: u8) -> Result<u8> {
        if volume > 100 {
            return Err(TrainerError::InvalidVolume(volume.to_string()));
        }

        // the store lock orders concurrent updates so the file matches memory
        let mut store = self.store.lock()
            .map_err(|_| TrainerError::Lock("volume store"))?;
        {
            let mut current = self.volume.lock()
                .map_err(|_| TrainerError::Lock("volume"))?;
            if *current == volume {
                return Ok(volume);
            }
            *current = volume;
        }
        if let Err(e) = store.save(volume) {
            warn!("Failed to persist volume {}: {}", volume, e);
        }
        drop(store);

        self.record_action("volume");
        self.notify_settings_changed()?;
        Ok(volume)
    }

    pub fn get_playlist(&self) -> Result<Playlist> {
        self.playlist.lock()
            .map(|p| p.clone())
            .map_err(|_| TrainerError::Lock("playlist"))
    }

    pub fn selected_track(&self) -> Result<Option<Track>> {
        self.playlist.lock()
            .map(|p| p.selected().cloned())
            .map_err(|_| TrainerError::Lock("playlist"))
    }

    /// Switch the background track
    pub fn select_track(&self, index: usize) -> Result<Track> {
        let track = {
            let mut playlist = self.playlist.lock()
                .map_err(|_| TrainerError::Lock("playlist"))?;
            if !playlist.select(index) {
                return Err(TrainerError::UnknownTrack(index));
            }
            playlist.selected().cloned().ok_or(TrainerError::UnknownTrack(index))?
        };

        info!("Selected track {} ({})", track.title, track.id);
        self.record_action("select-track");
        self.notify_settings_changed()?;
        Ok(track)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_action.lock().ok().and_then(|a| a.clone()) {
            Some((action, at)) => (Some(action), Some(at)),
            None => (None, None),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::ManualClock;
    use crate::state::default_tracks;

    pub(crate) fn test_state(clock: Arc<ManualClock>) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = VolumeStore::new(dir.path().join("store.json"));
        let state = AppState::new(
            TimerConfig::default(),
            Duration::from_millis(10),
            clock,
            Playlist::new(default_tracks()),
            store,
            50,
        );
        (state, dir)
    }

    #[test]
    fn toggle_walks_through_run_states() {
        let clock = Arc::new(ManualClock::new(1_000));
        let (state, _dir) = test_state(clock.clone());

        assert_eq!(state.snapshot().unwrap().phase, Phase::Inactive);

        state.toggle().unwrap();
        clock.advance(12_000);
        let snap = state.snapshot().unwrap();
        assert_eq!(snap.phase, Phase::Work { cycle_index: 0, elapsed: 2, left: 18 });

        assert_eq!(state.toggle().unwrap(), RunState::Paused { accumulated_ms: 12_000 });
        clock.advance(60_000);
        assert_eq!(state.snapshot().unwrap().phase, snap.phase);

        state.toggle().unwrap();
        assert_eq!(state.snapshot().unwrap().phase, snap.phase);

        assert_eq!(state.reset().unwrap(), RunState::Stopped { done: false });
        assert_eq!(state.snapshot().unwrap().phase, Phase::Inactive);
    }

    #[test]
    fn each_start_from_stopped_is_a_new_run() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, _dir) = test_state(clock.clone());
        assert_eq!(state.snapshot().unwrap().run_id, 0);

        state.toggle().unwrap();
        let first = state.snapshot().unwrap();
        assert_eq!(first.run_id, 1);

        // pause and resume stay within the same run
        clock.advance(500);
        state.toggle().unwrap();
        state.toggle().unwrap();
        assert_eq!(state.snapshot().unwrap().run_id, 1);

        // an immediate reset and restart replays the same first phase under a new run
        state.reset().unwrap();
        state.toggle().unwrap();
        let second = state.snapshot().unwrap();
        assert_eq!(second.run_id, 2);
        assert_eq!(second.phase, first.phase);
    }

    #[test]
    fn concurrent_volume_updates_leave_store_in_sync() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, dir) = test_state(clock);
        let state = Arc::new(state);

        let handles: Vec<_> = (1..=20u8)
            .map(|v| {
                let state = Arc::clone(&state);
                std::thread::spawn(move || state.set_volume(v).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let mut store = VolumeStore::new(dir.path().join("store.json"));
        assert_eq!(store.load().unwrap(), state.get_volume().unwrap());
    }

    #[test]
    fn complete_only_applies_to_running_timer() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, _dir) = test_state(clock);

        assert_eq!(state.complete().unwrap(), None);
        state.toggle().unwrap();
        assert_eq!(state.complete().unwrap(), Some(RunState::Stopped { done: true }));
        assert_eq!(state.snapshot().unwrap().phase, Phase::Done);
    }

    #[test]
    fn transitions_are_published() {
        let clock = Arc::new(ManualClock::new(5));
        let (state, _dir) = test_state(clock);
        let mut rx = state.subscribe();

        state.toggle().unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), RunState::Active { start_ms: 5 });
        assert!(!rx.has_changed().unwrap());

        state.set_volume(80).unwrap();
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn volume_is_validated_and_persisted() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, dir) = test_state(clock);

        assert!(matches!(state.set_volume(101), Err(TrainerError::InvalidVolume(_))));
        assert_eq!(state.set_volume(65).unwrap(), 65);
        assert_eq!(state.get_volume().unwrap(), 65);

        let mut store = VolumeStore::new(dir.path().join("store.json"));
        assert_eq!(store.load().unwrap(), 65);
    }

    #[test]
    fn select_track_checks_range() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, _dir) = test_state(clock);

        assert_eq!(state.select_track(1).unwrap().id, "9jTlMgM-kuY");
        assert_eq!(state.selected_track().unwrap().unwrap().id, "9jTlMgM-kuY");
        assert!(matches!(state.select_track(9), Err(TrainerError::UnknownTrack(9))));
        assert_eq!(state.get_playlist().unwrap().selected_index(), 1);
    }

    #[test]
    fn last_action_is_tracked() {
        let clock = Arc::new(ManualClock::new(0));
        let (state, _dir) = test_state(clock);

        assert_eq!(state.get_last_action(), (None, None));
        state.toggle().unwrap();
        assert_eq!(state.get_last_action().0.as_deref(), Some("toggle"));
    }
}
