// src/pipeline.rs
//! The one job this service does: fetch (with fallback) → persist → publish.
//! Both triggers call [`PipelineContext::run_once`].

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use once_cell::sync::OnceCell;

use crate::broadcast::Broadcaster;
use crate::error::PipelineError;
use crate::reading::SentimentReading;
use crate::source::{fallback::fetch_with_fallback, SentimentSource};
use crate::store::ReadingStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Scheduled,
    Manual,
    Cli,
}

impl Trigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Scheduled => "scheduled",
            Trigger::Manual => "manual",
            Trigger::Cli => "cli",
        }
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        metrics::describe_counter!("fng_runs_total", "Pipeline runs by trigger and outcome.");
        metrics::describe_counter!(
            "fng_fallback_total",
            "Runs where the primary source failed and the backup was tried."
        );
        metrics::describe_gauge!("fng_last_score", "Score of the last successful run.");
        metrics::describe_histogram!("fng_run_ms", "Pipeline wall time in milliseconds.");
    });
}

/// Handles the pipeline needs, built once at startup and shared by the
/// scheduler and the HTTP trigger. Cloning is cheap.
#[derive(Clone)]
pub struct PipelineContext {
    pub primary: Arc<dyn SentimentSource>,
    pub backup: Arc<dyn SentimentSource>,
    pub store: Arc<dyn ReadingStore>,
    pub broadcaster: Arc<dyn Broadcaster>,
}

impl PipelineContext {
    pub fn new(
        primary: Arc<dyn SentimentSource>,
        backup: Arc<dyn SentimentSource>,
        store: Arc<dyn ReadingStore>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            primary,
            backup,
            store,
            broadcaster,
        }
    }

    /// Run the full pipeline once. No step is retried; a persist failure
    /// skips the publish. Overlapping runs are not serialized, the last
    /// write to land wins.
    pub async fn run_once(&self, trigger: Trigger) -> Result<SentimentReading, PipelineError> {
        ensure_metrics_described();
        let t0 = Instant::now();

        let res = self.run_steps().await;

        let outcome = if res.is_ok() { "ok" } else { "error" };
        counter!("fng_runs_total", "trigger" => trigger.as_str(), "outcome" => outcome)
            .increment(1);
        histogram!("fng_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        if let Ok(r) = &res {
            gauge!("fng_last_score").set(r.score);
            tracing::info!(
                target: "fng",
                trigger = trigger.as_str(),
                score = r.score,
                timestamp = %r.timestamp,
                source = %r.source,
                "updated & broadcast"
            );
        }
        res
    }

    async fn run_steps(&self) -> Result<SentimentReading, PipelineError> {
        let reading = fetch_with_fallback(self.primary.as_ref(), self.backup.as_ref()).await?;
        self.store.persist(&reading).await?;
        self.broadcaster.publish(&reading).await?;
        Ok(reading)
    }
}
