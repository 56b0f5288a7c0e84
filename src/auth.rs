// src/auth.rs
//! Bearer tokens for Google REST calls (Firestore, FCM).
//!
//! Two modes:
//! - `Static`: a token handed in via config / `GOOGLE_OAUTH_ACCESS_TOKEN`
//! - `Metadata`: asked from the GCE/Cloud Run metadata server on every call

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub enum TokenSource {
    Static(String),
    Metadata { client: Client, url: String },
}

#[derive(Deserialize)]
struct MetadataToken {
    access_token: String,
}

impl TokenSource {
    pub fn metadata(client: Client) -> Self {
        TokenSource::Metadata {
            client,
            url: METADATA_TOKEN_URL.to_string(),
        }
    }

    /// Resolve the `[auth].access_token` config value:
    /// "ENV" reads `GOOGLE_OAUTH_ACCESS_TOKEN`, "METADATA" uses the metadata
    /// server, anything else is taken literally.
    pub fn from_config_value(value: &str, client: Client) -> anyhow::Result<Self> {
        let v = value.trim();
        if v.eq_ignore_ascii_case("env") {
            let tok = std::env::var(ENV_ACCESS_TOKEN)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_ACCESS_TOKEN} env var"))?;
            return Ok(TokenSource::Static(tok));
        }
        if v.eq_ignore_ascii_case("metadata") {
            return Ok(TokenSource::metadata(client));
        }
        if v.is_empty() {
            anyhow::bail!("empty access token in config");
        }
        Ok(TokenSource::Static(v.to_string()))
    }

    pub async fn bearer(&self) -> Result<String, String> {
        match self {
            TokenSource::Static(t) => Ok(t.clone()),
            TokenSource::Metadata { client, url } => {
                let resp = client
                    .get(url)
                    .header("Metadata-Flavor", "Google")
                    .timeout(METADATA_TIMEOUT)
                    .send()
                    .await
                    .map_err(|e| format!("metadata token request: {e}"))?
                    .error_for_status()
                    .map_err(|e| format!("metadata token status: {e}"))?;
                let tok: MetadataToken = resp
                    .json()
                    .await
                    .map_err(|e| format!("metadata token body: {e}"))?;
                Ok(tok.access_token)
            }
        }
    }
}
