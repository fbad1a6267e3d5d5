//! Best score persistence
//!
//! A single integer under a fixed key. Read once when a session is built,
//! written only when a finished run beats it. Every store may fail; the
//! session treats failures as "no persistence" and keeps playing.

use thiserror::Error;

/// Key (wasm32 LocalStorage) and file stem (native) of the stored value
pub const STORAGE_KEY: &str = "side_runner_best_score";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("best score I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored best score is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("best score storage unavailable: {0}")]
    Unavailable(String),
}

/// Get/set contract for the best score
pub trait BestScore {
    /// `Ok(None)` when nothing has been stored yet
    fn load(&mut self) -> Result<Option<u64>, StoreError>;

    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// In-process store; the default for sessions and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(score: u64) -> Self {
        Self { best: Some(score) }
    }

    pub fn best(&self) -> Option<u64> {
        self.best
    }
}

impl BestScore for MemoryStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        Ok(self.best)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.best = Some(score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::JsonFileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Serialize};

    use super::{BestScore, STORAGE_KEY, StoreError};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct BestScoreRecord {
        best_score: u64,
    }

    /// Best score kept in a small JSON file
    #[derive(Debug, Clone)]
    pub struct JsonFileStore {
        path: PathBuf,
    }

    impl JsonFileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<dir>/side_runner_best_score.json`
        pub fn in_dir(dir: impl AsRef<Path>) -> Self {
            Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl BestScore for JsonFileStore {
        fn load(&mut self) -> Result<Option<u64>, StoreError> {
            let json = match fs::read_to_string(&self.path) {
                Ok(json) => json,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e.into()),
            };
            let record: BestScoreRecord = serde_json::from_str(&json)?;
            log::info!("Loaded best score {} from {}", record.best_score, self.path.display());
            Ok(Some(record.best_score))
        }

        fn save(&mut self, score: u64) -> Result<(), StoreError> {
            let json = serde_json::to_string_pretty(&BestScoreRecord { best_score: score })?;
            fs::write(&self.path, json)?;
            log::info!("Best score {} saved to {}", score, self.path.display());
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{BestScore, STORAGE_KEY, StoreError};

    /// Best score in the browser's LocalStorage
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".into()))
        }
    }

    impl BestScore for LocalStorageStore {
        fn load(&mut self) -> Result<Option<u64>, StoreError> {
            let stored = Self::storage()?
                .get_item(STORAGE_KEY)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            match stored {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        }

        fn save(&mut self, score: u64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(STORAGE_KEY, &score.to_string())
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            log::info!("Best score {} saved", score);
            Ok(())
        }
    }
}
