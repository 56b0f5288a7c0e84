// src/broadcast/recording.rs
use std::sync::Mutex;

use super::{Broadcaster, PushMessage, DEFAULT_TOPIC};
use crate::error::PublishError;
use crate::reading::SentimentReading;

// --- Test helper ---
pub struct RecordingBroadcaster {
    pub sent: Mutex<Vec<PushMessage>>,
    fail: Option<String>,
}

impl RecordingBroadcaster {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: Some(message.into()),
        }
    }

    pub fn messages(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Default for RecordingBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn publish(&self, reading: &SentimentReading) -> Result<(), PublishError> {
        if let Some(msg) = &self.fail {
            return Err(PublishError::Transport(msg.clone()));
        }
        self.sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(PushMessage::for_reading(DEFAULT_TOPIC, reading));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
