// src/broadcast/fcm.rs
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{Broadcaster, PushMessage, DEFAULT_TOPIC};
use crate::auth::TokenSource;
use crate::error::PublishError;
use crate::reading::SentimentReading;

pub const DEFAULT_FCM_BASE: &str = "https://fcm.googleapis.com/v1";

/// FCM HTTP v1 sender (`projects/{id}/messages:send`).
#[derive(Clone)]
pub struct FcmBroadcaster {
    client: Client,
    token: TokenSource,
    base_url: String,
    project_id: String,
    topic: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: &'a PushMessage,
}

impl FcmBroadcaster {
    pub fn new(client: Client, token: TokenSource, project_id: impl Into<String>) -> Self {
        Self {
            client,
            token,
            base_url: DEFAULT_FCM_BASE.to_string(),
            project_id: project_id.into(),
            topic: DEFAULT_TOPIC.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    fn send_url(&self) -> String {
        format!("{}/projects/{}/messages:send", self.base_url, self.project_id)
    }
}

#[async_trait::async_trait]
impl Broadcaster for FcmBroadcaster {
    async fn publish(&self, reading: &SentimentReading) -> Result<(), PublishError> {
        let message = PushMessage::for_reading(&self.topic, reading);
        let bearer = self.token.bearer().await.map_err(PublishError::Auth)?;

        let resp = self
            .client
            .post(self.send_url())
            .bearer_auth(bearer)
            .timeout(self.timeout)
            .json(&SendRequest { message: &message })
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(PublishError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        tracing::debug!(target: "fng", topic = %self.topic, "fcm send ok");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}
