// src/broadcast/mod.rs
//! Topic fan-out of the latest reading as a silent, data-only push.

pub mod fcm;
pub mod log_only;
pub mod recording;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::PublishError;
use crate::reading::SentimentReading;

pub use fcm::FcmBroadcaster;
pub use log_only::LogBroadcaster;
pub use recording::RecordingBroadcaster;

pub const DEFAULT_TOPIC: &str = "fng-all";

#[async_trait::async_trait]
pub trait Broadcaster: Send + Sync {
    async fn publish(&self, reading: &SentimentReading) -> Result<(), PublishError>;
    fn name(&self) -> &'static str;
}

/// FCM v1 `Message`, reduced to the parts a background refresh needs. There
/// is deliberately no `notification` block: nothing is shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub topic: String,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidConfig {
    pub priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsConfig {
    pub headers: BTreeMap<&'static str, &'static str>,
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aps {
    #[serde(rename = "content-available")]
    pub content_available: u8,
}

impl PushMessage {
    pub fn for_reading(topic: &str, reading: &SentimentReading) -> Self {
        let mut data = BTreeMap::new();
        data.insert("score".to_string(), reading.score_text());
        data.insert("timestamp".to_string(), reading.timestamp.clone());
        data.insert("source".to_string(), reading.source.as_str().to_string());

        let mut apns_headers = BTreeMap::new();
        apns_headers.insert("apns-push-type", "background");
        // 5 is the only priority APNs accepts for background pushes.
        apns_headers.insert("apns-priority", "5");

        Self {
            topic: topic.to_string(),
            data,
            android: AndroidConfig { priority: "high" },
            apns: ApnsConfig {
                headers: apns_headers,
                payload: ApnsPayload {
                    aps: Aps {
                        content_available: 1,
                    },
                },
            },
        }
    }
}
