//! Best/last score persistence
//!
//! Each variant keeps its own record, so scores never bleed across variants.
//! The on-disk form is one small JSON object per variant:
//!
//! ```json
//! { "best": 120, "last": 40 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("score file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode scores: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The two persisted scalars
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub best: u32,
    pub last: u32,
}

impl ScoreRecord {
    /// Fold a finished session into the record
    pub fn with_final_score(self, final_score: u32) -> Self {
        Self {
            best: self.best.max(final_score),
            last: final_score,
        }
    }
}

/// Where session results are kept between runs
pub trait ScoreStore {
    fn load(&self) -> Result<ScoreRecord, StoreError>;

    /// Record the final score of a session and return the updated record
    fn record(&mut self, final_score: u32) -> Result<ScoreRecord, StoreError>;
}

/// JSON file per variant under a data directory
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    /// Store for `namespace` inside `dir`, i.e. `<dir>/<namespace>.json`
    pub fn new(dir: &Path, namespace: &str) -> Self {
        Self {
            path: dir.join(format!("{namespace}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> Result<ScoreRecord, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no score file yet");
                return Ok(ScoreRecord::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&json).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn record(&mut self, final_score: u32) -> Result<ScoreRecord, StoreError> {
        let previous = match self.load() {
            Ok(record) => record,
            Err(StoreError::Corrupt { path, source }) => {
                warn!(?path, %source, "score file is corrupt, starting a new record");
                ScoreRecord::default()
            }
            Err(err) => return Err(err),
        };
        let updated = previous.with_final_score(final_score);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Stage beside the target, then rename over it
        let json = serde_json::to_string_pretty(&updated)?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, json).map_err(|source| StoreError::Io {
            path: staging.clone(),
            source,
        })?;
        std::fs::rename(&staging, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!(path = ?self.path, best = updated.best, last = updated.last, "scores saved");
        Ok(updated)
    }
}

/// Store that forgets everything on exit
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    record: ScoreRecord,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Result<ScoreRecord, StoreError> {
        Ok(self.record)
    }

    fn record(&mut self, final_score: u32) -> Result<ScoreRecord, StoreError> {
        self.record = self.record.with_final_score(final_score);
        Ok(self.record)
    }
}
