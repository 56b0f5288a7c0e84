// src/source/mod.rs
pub mod fallback;
pub mod http;

use crate::error::FetchError;
use crate::reading::FetchedReading;

/// One tier of the fetch. Implementations perform a single attempt; retrying
/// is the orchestrator's business (and it never retries within a tier).
#[async_trait::async_trait]
pub trait SentimentSource: Send + Sync {
    async fn fetch(&self) -> Result<FetchedReading, FetchError>;
    fn name(&self) -> &'static str;
}
