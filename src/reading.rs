// src/reading.rs
use serde::{Deserialize, Serialize};

/// Which tier satisfied the fetch. Wire values follow the mobile client:
/// the primary origin is "cnn", the static mirror is "github".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTag {
    #[serde(rename = "cnn")]
    Primary,
    #[serde(rename = "github")]
    Backup,
}

impl SourceTag {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Primary => "cnn",
            SourceTag::Backup => "github",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated `{score, timestamp}` pulled out of an origin payload, before it
/// is tagged with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedReading {
    pub score: f64,
    /// Origin timestamp, kept verbatim.
    pub timestamp: String,
    pub rating: Option<String>,
}

impl FetchedReading {
    pub fn tagged(self, source: SourceTag) -> SentimentReading {
        SentimentReading {
            score: self.score,
            timestamp: self.timestamp,
            source,
        }
    }
}

/// The one entity the service persists and broadcasts. `updatedAt` is owned by
/// the store and never travels on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub score: f64,
    pub timestamp: String,
    pub source: SourceTag,
}

impl SentimentReading {
    /// Score as text the way JavaScript's `String(n)` prints it:
    /// `55.3 -> "55.3"`, `55.0 -> "55"`.
    pub fn score_text(&self) -> String {
        format_score(self.score)
    }
}

pub fn format_score(score: f64) -> String {
    // f64 Display is already shortest round-trip and drops a zero fraction.
    score.to_string()
}
