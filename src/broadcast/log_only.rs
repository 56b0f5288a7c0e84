// src/broadcast/log_only.rs
use super::{Broadcaster, PushMessage};
use crate::error::PublishError;
use crate::reading::SentimentReading;

/// Development sink: logs the message that would have been pushed.
pub struct LogBroadcaster {
    topic: String,
}

impl LogBroadcaster {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
        }
    }
}

#[async_trait::async_trait]
impl Broadcaster for LogBroadcaster {
    async fn publish(&self, reading: &SentimentReading) -> Result<(), PublishError> {
        let msg = PushMessage::for_reading(&self.topic, reading);
        let body = serde_json::to_string(&msg).map_err(|e| PublishError::Transport(e.to_string()))?;
        tracing::info!(target: "fng", topic = %self.topic, message = %body, "push (log only)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
