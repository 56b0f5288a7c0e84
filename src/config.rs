// src/config.rs
//! Service configuration. Loaded from TOML or JSON, with built-in defaults
//! for everything, so a bare deployment needs only credentials.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::broadcast::DEFAULT_TOPIC;
use crate::scheduler::{HourlySchedule, DEFAULT_CRON, DEFAULT_TIMEZONE, DEFAULT_UTC_OFFSET};
use crate::source::http::DEFAULT_TIMEOUT_SECS;
use crate::store::{file::DEFAULT_STATE_PATH, DEFAULT_COLLECTION, DEFAULT_DOCUMENT};

pub const ENV_CONFIG_PATH: &str = "FNG_CONFIG_PATH";
pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const DEFAULT_CONFIG_TOML: &str = "config/fng.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/fng.json";

pub const DEFAULT_REGION: &str = "asia-northeast3";
pub const CNN_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
pub const BACKUP_URL: &str =
    "https://thinker89.github.io/docs_hub/project_market_mood/api/cnn_api.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Deployment region label; informational only.
    pub region: String,
    pub sources: SourcesConfig,
    pub schedule: ScheduleConfig,
    pub store: StoreConfig,
    pub push: PushConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourcesConfig {
    pub primary_url: String,
    pub backup_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub cron: String,
    pub timezone: String,
    pub utc_offset: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Firestore,
    File,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,
    pub project_id: Option<String>,
    pub collection: String,
    pub document: String,
    /// Used by `kind = "file"`.
    pub path: String,
    /// Override for the Firestore REST base (emulator, tests).
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PushKind {
    Fcm,
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PushConfig {
    pub kind: PushKind,
    pub project_id: Option<String>,
    pub topic: String,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// "ENV" → `GOOGLE_OAUTH_ACCESS_TOKEN`, "METADATA" → metadata server,
    /// otherwise a literal token.
    pub access_token: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            sources: SourcesConfig::default(),
            schedule: ScheduleConfig::default(),
            store: StoreConfig::default(),
            push: PushConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary_url: CNN_URL.to_string(),
            backup_url: BACKUP_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron: DEFAULT_CRON.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::Firestore,
            project_id: None,
            collection: DEFAULT_COLLECTION.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
            path: DEFAULT_STATE_PATH.to_string(),
            base_url: None,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            kind: PushKind::Fcm,
            project_id: None,
            topic: DEFAULT_TOPIC.to_string(),
            base_url: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: "ENV".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit path. TOML or JSON, picked by extension.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let mut cfg = parse_config(&content, &ext)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $FNG_CONFIG_PATH
    /// 2) config/fng.toml
    /// 3) config/fng.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
        }
        for candidate in [DEFAULT_CONFIG_TOML, DEFAULT_CONFIG_JSON] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from(&pb);
            }
        }
        let mut cfg = Self::default();
        cfg.apply_env();
        Ok(cfg)
    }

    /// Fill missing project ids from `FIREBASE_PROJECT_ID`.
    fn apply_env(&mut self) {
        if let Ok(pid) = std::env::var(ENV_PROJECT_ID) {
            let pid = pid.trim().to_string();
            if pid.is_empty() {
                return;
            }
            if self.store.project_id.is_none() {
                self.store.project_id = Some(pid.clone());
            }
            if self.push.project_id.is_none() {
                self.push.project_id = Some(pid);
            }
        }
    }

    pub fn schedule(&self) -> Result<HourlySchedule> {
        HourlySchedule::parse(
            &self.schedule.cron,
            &self.schedule.timezone,
            &self.schedule.utc_offset,
        )
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<AppConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid JSON config");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!("unsupported config format: {toml_err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn defaults_match_production_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.region, "asia-northeast3");
        assert_eq!(cfg.sources.timeout_secs, 12);
        assert_eq!(cfg.schedule.cron, "55 * * * *");
        assert_eq!(cfg.schedule.timezone, "Asia/Seoul");
        assert_eq!(cfg.store.collection, "fng");
        assert_eq!(cfg.store.document, "latest");
        assert_eq!(cfg.push.topic, "fng-all");
        assert_eq!(cfg.schedule().unwrap().minute, 55);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let toml = r#"
            [store]
            kind = "file"
            path = "/tmp/x.json"

            [push]
            kind = "log"
        "#;
        let cfg = parse_config(toml, "toml").unwrap();
        assert_eq!(cfg.store.kind, StoreKind::File);
        assert_eq!(cfg.store.path, "/tmp/x.json");
        assert_eq!(cfg.push.kind, PushKind::Log);
        assert_eq!(cfg.sources.primary_url, CNN_URL);
        assert_eq!(cfg.schedule.utc_offset, "+09:00");
    }

    #[test]
    fn json_config_parses() {
        let json = r#"{"sources": {"timeout_secs": 3}, "store": {"kind": "memory"}}"#;
        let cfg = parse_config(json, "json").unwrap();
        assert_eq!(cfg.sources.timeout_secs, 3);
        assert_eq!(cfg.store.kind, StoreKind::Memory);

        // no hint: TOML fails, JSON succeeds
        let cfg = parse_config(json, "").unwrap();
        assert_eq!(cfg.store.kind, StoreKind::Memory);
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Run in a temp CWD so the repo's own config/ does not interfere
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();
        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_PROJECT_ID);

        let v = AppConfig::load_default().unwrap();
        assert_eq!(v, AppConfig::default());

        let p = tmp.path().join("custom.toml");
        fs::write(&p, "region = \"us-central1\"\n").unwrap();
        env::set_var(ENV_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_PROJECT_ID, "demo-proj");
        let v2 = AppConfig::load_default().unwrap();
        assert_eq!(v2.region, "us-central1");
        assert_eq!(v2.store.project_id.as_deref(), Some("demo-proj"));
        assert_eq!(v2.push.project_id.as_deref(), Some("demo-proj"));

        env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(AppConfig::load_default().is_err());

        env::remove_var(ENV_CONFIG_PATH);
        env::remove_var(ENV_PROJECT_ID);
        env::set_current_dir(&old).unwrap();
    }
}
