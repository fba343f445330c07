//! External collaborator module
//!
//! This module contains the clock, audio cue playback, background media
//! synchronisation and the persisted volume store.

pub mod audio;
pub mod clock;
pub mod media;
pub mod storage;

// Re-export main types
pub use audio::{CommandCuePlayer, Cue, CuePlayer, CueRequest, LogCuePlayer};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use media::{LogMediaPlayer, MediaCommand, MediaPlayer, PlayState};
pub use storage::{parse_volume, VolumeStore, DEFAULT_VOLUME, VOLUME_KEY};
