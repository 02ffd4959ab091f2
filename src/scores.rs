//! Best-score persistence
//!
//! The only state the game persists across sessions is a single integer.
//! The store is queried and updated once per game-over transition.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("score store I/O: {0}")]
    Io(#[from] io::Error),
    #[error("score store format: {0}")]
    Format(#[from] serde_json::Error),
}

/// Score store collaborator contract
pub trait ScoreStore: Send {
    /// Best score achieved so far
    fn high_score(&self) -> u32;

    /// Whether a round's final score beats the stored best
    fn is_new_best(&self, score: u32) -> bool {
        score > self.high_score()
    }

    /// Record a new best score
    fn store(&mut self, score: u32) -> Result<(), ScoreStoreError>;
}

/// Versioned on-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct ScoreEnvelope {
    version: u32,
    best: u32,
}

impl ScoreEnvelope {
    const VERSION: u32 = 1;
}

/// JSON-file-backed store
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
    best: u32,
}

impl FileScoreStore {
    /// Open a store at `path`. A missing file means no best score yet; a
    /// corrupt file is treated the same way (and logged), so a damaged
    /// envelope never takes the game down.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoreStoreError> {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<ScoreEnvelope>(&json) {
                Ok(envelope) => envelope.best,
                Err(err) => {
                    log::warn!("corrupt score envelope at {}: {err}", path.display());
                    0
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => 0,
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, best })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for FileScoreStore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn store(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        let envelope = ScoreEnvelope {
            version: ScoreEnvelope::VERSION,
            best: score,
        };
        let json = serde_json::to_string(&envelope)?;
        std::fs::write(&self.path, json)?;
        self.best = score;
        log::info!("best score {} persisted", score);
        Ok(())
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: u32,
}

impl MemoryScoreStore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn store(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        self.best = score;
        Ok(())
    }
}
