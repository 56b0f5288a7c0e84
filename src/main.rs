//! Fear & Greed broadcaster — Binary Entrypoint
//! Loads config, spawns the hourly scheduler, and hands the Axum router to
//! Shuttle.

use anyhow::Context;
use shuttle_axum::ShuttleAxum;

use fng_broadcaster::{
    api::{self, AppState},
    bootstrap::build_context,
    config::AppConfig,
    metrics::Metrics,
    scheduler::spawn_scheduler,
    telemetry,
};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    let cfg = AppConfig::load_default().context("loading config")?;
    let pipeline = build_context(&cfg).context("building pipeline context")?;

    if cfg.schedule.enabled {
        let schedule = cfg.schedule().context("parsing schedule")?;
        tracing::info!(
            target: "scheduler",
            cron = %cfg.schedule.cron,
            tz = %schedule.timezone,
            "scheduler enabled"
        );
        spawn_scheduler(pipeline.clone(), schedule);
    } else {
        tracing::warn!(target: "scheduler", "scheduler disabled by config");
    }

    let mut router = api::router(AppState { pipeline });
    match Metrics::init() {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => tracing::warn!(error = %e, "prometheus recorder not installed"),
    }

    Ok(router.into())
}
