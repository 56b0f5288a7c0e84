// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod reading;
pub mod scheduler;
pub mod source;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::{FetchError, PersistenceError, PipelineError, PublishError};
pub use crate::pipeline::{PipelineContext, Trigger};
pub use crate::reading::{SentimentReading, SourceTag};
