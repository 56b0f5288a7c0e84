// src/store/file.rs
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use super::{merge_into, ReadingStore, StoredRecord};
use crate::error::PersistenceError;
use crate::reading::SentimentReading;

pub const DEFAULT_STATE_PATH: &str = "state/fng_latest.json";

/// Local JSON document for development. A corrupt or missing file is treated
/// as an empty record.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Option<StoredRecord> {
        let s = fs::read_to_string(&self.path).await.ok()?;
        serde_json::from_str(&s).ok()
    }
}

#[async_trait::async_trait]
impl ReadingStore for FileStore {
    async fn persist(&self, reading: &SentimentReading) -> Result<(), PersistenceError> {
        let existing = match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or(serde_json::Value::Null),
            Err(_) => serde_json::Value::Null,
        };
        let doc = merge_into(existing, reading, Utc::now());

        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(d) => d.to_path_buf(),
            None => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).await?;
        let bytes = serde_json::to_vec_pretty(&doc)
            .map_err(|e| PersistenceError::Rejected {
                status: 0,
                message: e.to_string(),
            })?;

        // One temp file per write, renamed over the target.
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), PersistenceError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| PersistenceError::Io(std::io::Error::other(e)))?
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
