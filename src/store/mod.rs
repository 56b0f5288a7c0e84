// src/store/mod.rs
//! Single-slot persistence for the latest reading.

pub mod file;
pub mod firestore;
pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::reading::{SentimentReading, SourceTag};

pub use file::FileStore;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

pub const DEFAULT_COLLECTION: &str = "fng";
pub const DEFAULT_DOCUMENT: &str = "latest";

/// Merge-upsert of one fixed record. Every call stamps `updatedAt`, even when
/// the reading is identical to the previous one.
#[async_trait::async_trait]
pub trait ReadingStore: Send + Sync {
    async fn persist(&self, reading: &SentimentReading) -> Result<(), PersistenceError>;
    fn name(&self) -> &'static str;
}

/// Shape of the persisted record as the local backends keep it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub score: f64,
    pub timestamp: String,
    pub source: SourceTag,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Merge the reading's fields into an existing JSON object, leaving unrelated
/// keys alone. Non-object input is replaced.
pub(crate) fn merge_into(
    existing: serde_json::Value,
    reading: &SentimentReading,
    now: DateTime<Utc>,
) -> serde_json::Value {
    let mut map = match existing {
        serde_json::Value::Object(m) => m,
        _ => serde_json::Map::new(),
    };
    map.insert("score".into(), serde_json::json!(reading.score));
    map.insert(
        "timestamp".into(),
        serde_json::Value::String(reading.timestamp.clone()),
    );
    map.insert(
        "source".into(),
        serde_json::Value::String(reading.source.as_str().to_string()),
    );
    map.insert(
        "updatedAt".into(),
        serde_json::Value::String(now.to_rfc3339()),
    );
    serde_json::Value::Object(map)
}
