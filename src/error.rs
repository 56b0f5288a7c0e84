// src/error.rs
//! Error taxonomy for one pipeline run: fetch, persist, publish.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {secs}s @ {url}")]
    Timeout { url: String, secs: u64 },

    #[error("request failed @ {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} @ {url}")]
    Status { url: String, status: u16 },

    #[error("body is not JSON @ {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("{source_name} payload missing fields")]
    MissingFields { source_name: &'static str },

    #[error("http client setup: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("store unreachable: {0}")]
    Unreachable(String),

    #[error("store rejected write ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("store auth: {0}")]
    Auth(String),

    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("push transport failed: {0}")]
    Transport(String),

    #[error("push rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("push auth: {0}")]
    Auth(String),
}

/// Anything that aborts a run. Only a backup-tier `FetchError` ever lands in
/// `Fetch`; primary failures are consumed by the fallback.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Persist(#[from] PersistenceError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}
