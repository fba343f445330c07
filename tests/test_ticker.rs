//! End-to-end tests for the resampling task with a manual clock

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use interval_trainer::{
    services::{Cue, CuePlayer, CueRequest, ManualClock, MediaCommand, MediaPlayer, PlayState, VolumeStore},
    state::{default_tracks, AppState, Phase, Playlist, RunState, TimerConfig},
    tasks::{ticker_task, Dispatcher},
};

#[derive(Default)]
struct RecordingCues(Mutex<Vec<CueRequest>>);

impl CuePlayer for RecordingCues {
    fn play(&self, request: CueRequest) {
        self.0.lock().unwrap().push(request);
    }
}

impl RecordingCues {
    fn played(&self) -> Vec<CueRequest> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct RecordingMedia(Mutex<Vec<MediaCommand>>);

impl MediaPlayer for RecordingMedia {
    fn sync(&self, command: &MediaCommand) {
        self.0.lock().unwrap().push(command.clone());
    }
}

struct Harness {
    clock: Arc<ManualClock>,
    state: Arc<AppState>,
    cues: Arc<RecordingCues>,
    media: Arc<RecordingMedia>,
    _dir: tempfile::TempDir,
}

fn start() -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let state = Arc::new(AppState::new(
        TimerConfig::default(),
        Duration::from_millis(10),
        clock.clone(),
        Playlist::new(default_tracks()),
        VolumeStore::new(dir.path().join("store.json")),
        50,
    ));

    let cues = Arc::new(RecordingCues::default());
    let media = Arc::new(RecordingMedia::default());
    let dispatcher = Dispatcher::new(cues.clone(), media.clone());
    tokio::spawn(ticker_task(Arc::clone(&state), dispatcher));

    Harness { clock, state, cues, media, _dir: dir }
}

async fn wait_for<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn full_workout_completes_and_cues_fire_once() {
    let h = start();

    h.state.toggle().unwrap();
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Start))).await;

    h.clock.set(7_000);
    wait_for(|| h.cues.played().contains(&CueRequest::rewind(Cue::Count(3)))).await;

    h.clock.set(10_000);
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Go))).await;

    h.clock.set(240_000);
    wait_for(|| h.state.get_run_state().unwrap() == RunState::Stopped { done: true }).await;

    // more time passes, nothing should repeat
    h.clock.set(400_000);
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(
        h.cues.played(),
        vec![
            CueRequest::play(Cue::Start),
            CueRequest::rewind(Cue::Count(3)),
            CueRequest::play(Cue::Go),
            CueRequest::play(Cue::Done),
        ]
    );
    assert_eq!(h.state.snapshot().unwrap().phase, Phase::Done);

    let media = h.media.0.lock().unwrap().clone();
    assert_eq!(media.last().unwrap().play_state, PlayState::Stopped);
}

#[tokio::test]
async fn paused_timer_is_not_resampled() {
    let h = start();

    h.state.toggle().unwrap();
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Start))).await;
    h.clock.set(10_000);
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Go))).await;

    h.clock.set(15_000);
    h.state.toggle().unwrap();
    let paused = h.state.snapshot().unwrap();
    assert_eq!(paused.run_state, RunState::Paused { accumulated_ms: 15_000 });

    let played = h.cues.played().len();
    h.clock.set(500_000);
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(h.cues.played().len(), played);
    assert!(h.state.get_run_state().unwrap().is_paused());
    assert_eq!(h.state.snapshot().unwrap().phase, paused.phase);

    // resume picks up exactly where the pause left off
    h.state.toggle().unwrap();
    assert_eq!(h.state.snapshot().unwrap().phase, paused.phase);
    assert_eq!(h.state.get_run_state().unwrap(), RunState::Active { start_ms: 485_000 });
}

#[tokio::test]
async fn reset_stops_resampling() {
    let h = start();

    h.state.toggle().unwrap();
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Start))).await;

    h.state.reset().unwrap();
    h.clock.set(10_000);
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(h.cues.played(), vec![CueRequest::play(Cue::Start)]);
    assert_eq!(h.state.snapshot().unwrap().phase, Phase::Inactive);
    assert_eq!(h.state.get_run_state().unwrap(), RunState::Stopped { done: false });
}

#[tokio::test]
async fn volume_change_resyncs_media() {
    let h = start();

    h.state.toggle().unwrap();
    h.clock.set(12_000);
    wait_for(|| h.media.0.lock().unwrap().iter().any(|c| c.volume == 50)).await;

    h.state.set_volume(90).unwrap();
    wait_for(|| h.media.0.lock().unwrap().iter().any(|c| c.volume == 90)).await;
}

#[tokio::test]
async fn immediate_restart_replays_start_cue() {
    let h = start();

    h.state.toggle().unwrap();
    wait_for(|| h.cues.played().contains(&CueRequest::play(Cue::Start))).await;

    // reset and restart without yielding, so the ticker never sees the stop
    h.clock.set(500);
    h.state.reset().unwrap();
    h.state.toggle().unwrap();

    let start_cues = || {
        h.cues
            .played()
            .iter()
            .filter(|c| **c == CueRequest::play(Cue::Start))
            .count()
    };
    wait_for(|| start_cues() == 2).await;
    assert_eq!(h.state.snapshot().unwrap().run_id, 2);
}
