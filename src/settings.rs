//! Runtime preferences
//!
//! Persisted separately from scores as a small JSON file. Nothing here
//! affects simulation correctness; hosts read these to decide what to wire
//! up around the core.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O: {0}")]
    Io(#[from] io::Error),
    #[error("settings format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Host preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Fixed session seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Sound effects on/off
    pub sound: bool,
    /// Haptic feedback on player hits
    pub haptics: bool,
    /// Hosts may shorten explosion playback
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            sound: true,
            haptics: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Load from disk; a missing or corrupt file yields the defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("corrupt settings at {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    log::warn!("could not read settings at {}: {err}", path.display());
                }
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), SettingsError> {
        let path = path.into();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}
