//! Audio cue playback

use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Named audio cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    Go,
    Rest,
    /// Countdown beep for 1, 2 or 3 seconds left
    Count(u8),
    Done,
}

impl Cue {
    /// Name of the sample file without extension
    pub fn name(&self) -> String {
        match self {
            Cue::Start => "start".to_string(),
            Cue::Go => "go".to_string(),
            Cue::Rest => "rest".to_string(),
            Cue::Count(n) => format!("count{}", n),
            Cue::Done => "done".to_string(),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Request to play a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueRequest {
    pub cue: Cue,
    /// Restart the cue from the beginning instead of overlapping a running play
    pub rewind: bool,
}

impl CueRequest {
    pub fn play(cue: Cue) -> Self {
        Self { cue, rewind: false }
    }

    pub fn rewind(cue: Cue) -> Self {
        Self { cue, rewind: true }
    }
}

/// Plays audio cues. Fire-and-forget: failures are logged, never returned.
pub trait CuePlayer: Send + Sync {
    fn play(&self, request: CueRequest);
}

/// Player that only logs the cues it is asked to play
#[derive(Debug, Default)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&self, request: CueRequest) {
        info!("Cue: {}{}", request.cue, if request.rewind { " (rewind)" } else { "" });
    }
}

/// Player that shells out to an external program with `<dir>/<cue>.wav`
#[derive(Debug)]
pub struct CommandCuePlayer {
    command: String,
    cue_dir: PathBuf,
    /// Last rewindable play of each cue
    playing: Mutex<HashMap<Cue, Child>>,
}

impl CommandCuePlayer {
    pub fn new(command: String, cue_dir: PathBuf) -> Self {
        Self {
            command,
            cue_dir,
            playing: Mutex::new(HashMap::new()),
        }
    }

    pub fn sample_path(&self, cue: Cue) -> PathBuf {
        self.cue_dir.join(format!("{}.wav", cue.name()))
    }

    fn spawn(&self, cue: Cue) -> std::io::Result<Child> {
        Command::new(&self.command)
            .arg(self.sample_path(cue))
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
    }
}

impl CuePlayer for CommandCuePlayer {
    fn play(&self, request: CueRequest) {
        let mut playing = match self.playing.lock() {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to lock cue player: {}", e);
                return;
            }
        };

        if request.rewind {
            if let Some(mut previous) = playing.remove(&request.cue) {
                if let Err(e) = previous.start_kill() {
                    debug!("Previous {} play already finished: {}", request.cue, e);
                }
                tokio::spawn(async move {
                    let _ = previous.wait().await;
                });
            }
        }

        match self.spawn(request.cue) {
            Ok(child) => {
                debug!("Playing cue {} via {}", request.cue, self.command);
                if request.rewind {
                    playing.insert(request.cue, child);
                }
            }
            Err(e) => warn!("Failed to play cue {}: {}", request.cue, e),
        }
    }
}
