//! Error types

use thiserror::Error;

/// Errors surfaced by the trainer's state and storage layers
#[derive(Debug, Error)]
pub enum TrainerError {
    /// A shared state mutex was poisoned
    #[error("failed to lock {0}")]
    Lock(&'static str),

    /// Volume outside 0..=100 or not a number
    #[error("invalid volume: {0}")]
    InvalidVolume(String),

    /// Playlist index out of range
    #[error("no track at index {0}")]
    UnknownTrack(usize),

    /// Reading or writing the key-value store failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key-value store holds malformed JSON
    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrainerError {
    /// Whether the error was caused by bad client input
    pub fn is_client_error(&self) -> bool {
        matches!(self, TrainerError::InvalidVolume(_) | TrainerError::UnknownTrack(_))
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
