//! Run the pipeline a single time and print the result as JSON.
//! Exit code is non-zero when the run fails.

use fng_broadcaster::{bootstrap::build_context, config::AppConfig, telemetry, Trigger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = AppConfig::load_default()?;
    let ctx = build_context(&cfg)?;

    match ctx.run_once(Trigger::Cli).await {
        Ok(r) => {
            let out = serde_json::json!({
                "ok": true,
                "score": r.score,
                "timestamp": r.timestamp,
                "source": r.source,
            });
            println!("{out}");
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::json!({ "ok": false, "error": e.to_string() }));
            Err(e.into())
        }
    }
}
