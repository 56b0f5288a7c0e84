// src/source/http.rs
//! HTTP tier: one bounded GET against an origin that serves the
//! `{fear_and_greed: {score, rating?, timestamp}}` shape.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::FetchError;
use crate::reading::FetchedReading;
use crate::source::SentimentSource;

pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

// Mobile-app look-alike headers; the origin occasionally blocks bare clients.
pub const SPOOF_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; FnGApp)";
pub const SPOOF_ACCEPT: &str = "*/*";
pub const SPOOF_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,ko;q=0.8";
pub const SPOOF_CACHE_CONTROL: &str = "no-cache";

pub fn spoof_headers() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, HeaderValue::from_static(SPOOF_USER_AGENT));
    h.insert(ACCEPT, HeaderValue::from_static(SPOOF_ACCEPT));
    h.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(SPOOF_ACCEPT_LANGUAGE));
    h.insert(CACHE_CONTROL, HeaderValue::from_static(SPOOF_CACHE_CONTROL));
    h
}

/// Client shared by both tiers. Timeouts are applied per request.
pub fn build_client() -> Result<Client, FetchError> {
    Client::builder()
        .default_headers(spoof_headers())
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

#[derive(Clone)]
pub struct HttpSource {
    name: &'static str,
    url: String,
    client: Client,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(name: &'static str, url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self::with_client(name, url, build_client()?))
    }

    pub fn with_client(name: &'static str, url: impl Into<String>, client: Client) -> Self {
        Self {
            name,
            url: url.into(),
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: self.url.clone(),
                secs: self.timeout.as_secs(),
            }
        } else {
            FetchError::Http {
                url: self.url.clone(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl SentimentSource for HttpSource {
    async fn fetch(&self) -> Result<FetchedReading, FetchError> {
        tracing::debug!(target: "fng", source = self.name, url = %self.url, "fetching");

        // The per-request timeout covers connect, headers and body; when it
        // fires the in-flight future is dropped, which aborts the request.
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|e| self.map_send_error(e))?;
        let doc = decode_body(&body).map_err(|reason| FetchError::Decode {
            url: self.url.clone(),
            reason,
        })?;

        extract_reading(&doc).ok_or(FetchError::MissingFields {
            source_name: self.name,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Strict JSON first; if that fails, treat the body as text (lossy UTF-8,
/// stray BOM, surrounding whitespace) and parse again.
pub fn decode_body(body: &[u8]) -> Result<Value, String> {
    match serde_json::from_slice::<Value>(body) {
        Ok(v) => Ok(v),
        Err(strict) => {
            let text = String::from_utf8_lossy(body);
            let cleaned = text.trim_start_matches('\u{feff}').trim();
            serde_json::from_str::<Value>(cleaned).map_err(|lenient| {
                format!("strict: {strict}; text: {lenient}")
            })
        }
    }
}

/// Pull `fear_and_greed.{score,timestamp,rating}`. `None` unless the score is
/// a JSON number and the timestamp a non-empty string.
pub fn extract_reading(doc: &Value) -> Option<FetchedReading> {
    let fg = doc.get("fear_and_greed")?;
    let score = fg.get("score").filter(|v| v.is_number())?.as_f64()?;
    let timestamp = fg
        .get("timestamp")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let rating = fg.get("rating").and_then(Value::as_str).map(str::to_string);

    Some(FetchedReading {
        score,
        timestamp: timestamp.to_string(),
        rating,
    })
}
