//! Background track playlist

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A background track with the offset playback should begin at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub start_offset_secs: u32,
    pub title: String,
}

impl Track {
    pub fn new(id: &str, start_offset_secs: u32, title: &str) -> Self {
        Self {
            id: id.to_string(),
            start_offset_secs,
            title: title.to_string(),
        }
    }
}

/// Built-in track list
pub fn default_tracks() -> Vec<Track> {
    vec![
        Track::new("zb5-CXOeYj4", 0, "9-9s"),
        Track::new("9jTlMgM-kuY", 13, "Gonzi - Turn it up"),
        Track::new("y0GcRu6qSa0", 12, "Parasomnia"),
        Track::new("hUTGTflHTrE", 1, "Doruksen - Intoxicated"),
        Track::new("QRU5jpPgdfo", 0, "Mahtal - All in This"),
    ]
}

/// Ordered track list with a current selection
#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    tracks: Vec<Track>,
    selected: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks, selected: 0 }
    }

    /// Build a playlist in random order, shuffled once
    pub fn shuffled<R: Rng + ?Sized>(mut tracks: Vec<Track>, rng: &mut R) -> Self {
        tracks.shuffle(rng);
        Self::new(tracks)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    /// Select a track by position; returns false when out of range
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }
}
