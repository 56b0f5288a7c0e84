// src/bootstrap.rs
//! Turn an [`AppConfig`] into a ready [`PipelineContext`].

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenSource;
use crate::broadcast::{Broadcaster, FcmBroadcaster, LogBroadcaster};
use crate::config::{AppConfig, PushKind, StoreKind};
use crate::pipeline::PipelineContext;
use crate::source::http::{build_client, HttpSource};
use crate::store::{FileStore, FirestoreStore, MemoryStore, ReadingStore};

pub fn build_context(cfg: &AppConfig) -> Result<PipelineContext> {
    // Spoofed headers are scoped to the origin client; Google APIs get a
    // plain one.
    let origin = build_client().context("building origin http client")?;
    let google = reqwest::Client::builder()
        .build()
        .context("building google http client")?;

    let timeout = Duration::from_secs(cfg.sources.timeout_secs);
    let primary = HttpSource::with_client("CNN", &cfg.sources.primary_url, origin.clone())
        .with_timeout(timeout);
    let backup =
        HttpSource::with_client("GitHub", &cfg.sources.backup_url, origin).with_timeout(timeout);

    // Only resolve a token when something actually talks to Google.
    let needs_token = cfg.store.kind == StoreKind::Firestore || cfg.push.kind == PushKind::Fcm;
    let token = if needs_token {
        Some(TokenSource::from_config_value(&cfg.auth.access_token, google.clone())?)
    } else {
        None
    };

    let store: Arc<dyn ReadingStore> = match cfg.store.kind {
        StoreKind::Firestore => {
            let project = cfg
                .store
                .project_id
                .clone()
                .context("store.project_id (or FIREBASE_PROJECT_ID) is required for firestore")?;
            let mut s = FirestoreStore::new(google.clone(), token.clone().context("token")?, project)
                .with_record(&cfg.store.collection, &cfg.store.document);
            if let Some(base) = &cfg.store.base_url {
                s = s.with_base_url(base);
            }
            Arc::new(s)
        }
        StoreKind::File => Arc::new(FileStore::new(&cfg.store.path)),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    let broadcaster: Arc<dyn Broadcaster> = match cfg.push.kind {
        PushKind::Fcm => {
            let project = cfg
                .push
                .project_id
                .clone()
                .context("push.project_id (or FIREBASE_PROJECT_ID) is required for fcm")?;
            let mut b = FcmBroadcaster::new(google, token.context("token")?, project)
                .with_topic(&cfg.push.topic);
            if let Some(base) = &cfg.push.base_url {
                b = b.with_base_url(base);
            }
            Arc::new(b)
        }
        PushKind::Log => Arc::new(LogBroadcaster::new(&cfg.push.topic)),
    };

    tracing::info!(
        target: "fng",
        region = %cfg.region,
        store = store.name(),
        push = broadcaster.name(),
        primary = %cfg.sources.primary_url,
        backup = %cfg.sources.backup_url,
        timeout_secs = cfg.sources.timeout_secs,
        "pipeline context ready"
    );

    Ok(PipelineContext::new(
        Arc::new(primary),
        Arc::new(backup),
        store,
        broadcaster,
    ))
}
