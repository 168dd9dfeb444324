//! Best score persistence.
//!
//! The score is kept in a small JSON file in the user's data directory. Reads
//! fall back to 0 and writes are best-effort: a broken score file never stops
//! the game.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const APP_DIR: &str = "flappy-arcade";
const SCORE_FILE: &str = "best_score.json";

pub trait ScoreStore {
    /// Stored best score, or 0 when absent or unreadable.
    fn read_best(&self) -> u32;
    fn write_best(&mut self, score: u32);
}

/// Default data directory, `<local data dir>/flappy-arcade`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR))
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BestScoreFile {
    best: u32,
}

#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SCORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<u32> {
        let contents = fs::read_to_string(&self.path)?;
        let file: BestScoreFile = serde_json::from_str(&contents)?;
        Ok(file.best)
    }

    fn save(&self, best: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&BestScoreFile { best })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn read_best(&self) -> u32 {
        if !self.path.exists() {
            tracing::info!("No best score file at {:?}, starting from 0", self.path);
            return 0;
        }
        match self.load() {
            Ok(best) => {
                tracing::info!("Loaded best score {} from {:?}", best, self.path);
                best
            }
            Err(e) => {
                tracing::warn!("Failed to read best score: {}", e);
                0
            }
        }
    }

    fn write_best(&mut self, score: u32) {
        match self.save(score) {
            Ok(()) => tracing::info!("Saved best score {} to {:?}", score, self.path),
            Err(e) => tracing::warn!("Failed to save best score: {}", e),
        }
    }
}

/// Keeps the best score for the lifetime of the process only. Used when no
/// data directory is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryScoreStore {
    best: u32,
}

impl ScoreStore for MemoryScoreStore {
    fn read_best(&self) -> u32 {
        self.best
    }

    fn write_best(&mut self, score: u32) {
        self.best = score;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScoreStore::in_dir(dir.path());
        assert_eq!(store.read_best(), 0);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonScoreStore::in_dir(&dir.path().join("nested"));
        store.write_best(42);
        assert_eq!(store.read_best(), 42);

        let reopened = JsonScoreStore::in_dir(&dir.path().join("nested"));
        assert_eq!(reopened.read_best(), 42);
    }

    #[test]
    fn test_garbage_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScoreStore::in_dir(dir.path());
        fs::write(store.path(), "not json {").unwrap();
        assert_eq!(store.read_best(), 0);
    }

    #[test]
    fn test_negative_value_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonScoreStore::in_dir(dir.path());
        fs::write(store.path(), r#"{"best": -3}"#).unwrap();
        assert_eq!(store.read_best(), 0);
    }

    #[test]
    fn test_unwritable_path_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a dir").unwrap();
        let mut store = JsonScoreStore::in_dir(&blocker);
        store.write_best(5);
        assert_eq!(store.read_best(), 0);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryScoreStore::default();
        assert_eq!(store.read_best(), 0);
        store.write_best(9);
        assert_eq!(store.read_best(), 9);
    }
}
