// src/store/firestore.rs
//! Firestore REST backend. One `documents:commit` per write: an update with an
//! `updateMask` over our three fields (merge semantics, other fields survive)
//! plus a `REQUEST_TIME` transform so `updatedAt` is the server's clock.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{ReadingStore, DEFAULT_COLLECTION, DEFAULT_DOCUMENT};
use crate::auth::TokenSource;
use crate::error::PersistenceError;
use crate::reading::SentimentReading;

pub const DEFAULT_FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    token: TokenSource,
    base_url: String,
    project_id: String,
    collection: String,
    document: String,
    timeout: Duration,
}

impl FirestoreStore {
    pub fn new(client: Client, token: TokenSource, project_id: impl Into<String>) -> Self {
        Self {
            client,
            token,
            base_url: DEFAULT_FIRESTORE_BASE.to_string(),
            project_id: project_id.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Point at an emulator or test server.
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_record(mut self, collection: impl Into<String>, document: impl Into<String>) -> Self {
        self.collection = collection.into();
        self.document = document.into();
        self
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)", self.project_id)
    }

    pub fn document_name(&self) -> String {
        format!(
            "{}/documents/{}/{}",
            self.database_path(),
            self.collection,
            self.document
        )
    }

    fn commit_url(&self) -> String {
        format!("{}/{}/documents:commit", self.base_url, self.database_path())
    }

    pub fn commit_body(&self, reading: &SentimentReading) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": self.document_name(),
                    "fields": {
                        "score": number_value(reading.score),
                        "timestamp": { "stringValue": reading.timestamp },
                        "source": { "stringValue": reading.source.as_str() },
                    }
                },
                "updateMask": { "fieldPaths": ["score", "timestamp", "source"] },
                "updateTransforms": [{
                    "fieldPath": "updatedAt",
                    "setToServerValue": "REQUEST_TIME"
                }]
            }]
        })
    }
}

/// Integral scores go in as `integerValue` (int64 as a decimal string), the
/// rest as `doubleValue`, matching how JS numbers are encoded by the admin SDK.
fn number_value(score: f64) -> Value {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if score.fract() == 0.0 && score.abs() <= MAX_SAFE {
        json!({ "integerValue": format!("{}", score as i64) })
    } else {
        json!({ "doubleValue": score })
    }
}

#[async_trait::async_trait]
impl ReadingStore for FirestoreStore {
    async fn persist(&self, reading: &SentimentReading) -> Result<(), PersistenceError> {
        let bearer = self.token.bearer().await.map_err(PersistenceError::Auth)?;

        let resp = self
            .client
            .post(self.commit_url())
            .bearer_auth(bearer)
            .timeout(self.timeout)
            .json(&self.commit_body(reading))
            .send()
            .await
            .map_err(|e| PersistenceError::Unreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PersistenceError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(target: "fng", doc = %self.document_name(), "firestore commit ok");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}
