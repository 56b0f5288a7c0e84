// src/store/memory.rs
use std::sync::Mutex;

use chrono::Utc;

use super::{merge_into, ReadingStore, StoredRecord};
use crate::error::PersistenceError;
use crate::reading::SentimentReading;

/// In-process record; used by tests and dry runs. Can be switched into a
/// failing mode to exercise the abort path.
#[derive(Default)]
pub struct MemoryStore {
    doc: Mutex<Option<serde_json::Value>>,
    writes: Mutex<usize>,
    fail: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        let s = Self::default();
        *s.fail.lock().unwrap_or_else(|p| p.into_inner()) = Some(message.into());
        s
    }

    pub fn latest(&self) -> Option<StoredRecord> {
        let doc = self.doc.lock().unwrap_or_else(|p| p.into_inner());
        doc.clone().and_then(|v| serde_json::from_value(v).ok())
    }

    pub fn raw(&self) -> Option<serde_json::Value> {
        self.doc.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait::async_trait]
impl ReadingStore for MemoryStore {
    async fn persist(&self, reading: &SentimentReading) -> Result<(), PersistenceError> {
        if let Some(msg) = self.fail.lock().unwrap_or_else(|p| p.into_inner()).clone() {
            return Err(PersistenceError::Unreachable(msg));
        }
        let mut doc = self.doc.lock().unwrap_or_else(|p| p.into_inner());
        let existing = doc.take().unwrap_or(serde_json::Value::Null);
        *doc = Some(merge_into(existing, reading, Utc::now()));
        *self.writes.lock().unwrap_or_else(|p| p.into_inner()) += 1;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
