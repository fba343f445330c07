//! Persisted volume setting
//!
//! Backed by a small JSON object file so more keys can share it later.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::{Result, TrainerError};

pub const VOLUME_KEY: &str = "volume";
pub const DEFAULT_VOLUME: u8 = 50;

/// Parse a stored volume string
pub fn parse_volume(raw: &str) -> Result<u8> {
    match raw.trim().parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(TrainerError::InvalidVolume(raw.to_string())),
    }
}

/// Single-key store for the volume level
#[derive(Debug)]
pub struct VolumeStore {
    path: PathBuf,
    stored: Option<String>,
}

impl VolumeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), stored: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the stored volume, writing the default if the key is missing
    pub fn load(&mut self) -> Result<u8> {
        let entries = self.read_all()?;
        match entries.get(VOLUME_KEY) {
            Some(raw) => {
                let volume = parse_volume(raw)?;
                self.stored = Some(raw.clone());
                debug!("Loaded volume {} from {}", volume, self.path.display());
                Ok(volume)
            }
            None => {
                info!("No stored volume, initialising to {}", DEFAULT_VOLUME);
                self.save(DEFAULT_VOLUME)?;
                Ok(DEFAULT_VOLUME)
            }
        }
    }

    /// Persist the volume; a value equal to the stored one is not rewritten.
    /// Returns whether the file was written.
    pub fn save(&mut self, volume: u8) -> Result<bool> {
        let value = volume.to_string();
        if self.stored.as_deref() == Some(value.as_str()) {
            return Ok(false);
        }

        let mut entries = self.read_all()?;
        entries.insert(VOLUME_KEY.to_string(), value.clone());
        std::fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        self.stored = Some(value);
        debug!("Stored volume {} in {}", volume, self.path.display());
        Ok(true)
    }
}
