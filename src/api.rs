// src/api.rs
//! HTTP surface: health check and the manual pipeline trigger.

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::pipeline::{PipelineContext, Trigger};
use crate::reading::SourceTag;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: PipelineContext,
}

/// CORS applies to `/health` only. `/run` answers every method itself,
/// preflight included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { "ok" }).layer(CorsLayer::very_permissive()),
        )
        .route("/run", any(manual_run))
        .with_state(state)
}

#[derive(Serialize)]
struct RunOk {
    ok: bool,
    score: f64,
    timestamp: String,
    source: SourceTag,
}

#[derive(Serialize)]
struct RunErr {
    ok: bool,
    error: String,
}

/// GET or POST runs the pipeline to completion and reports the result; any
/// other method is refused before anything is fetched.
async fn manual_run(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::GET && method != Method::POST {
        return (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    }

    match state.pipeline.run_once(Trigger::Manual).await {
        Ok(r) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
            Json(RunOk {
                ok: true,
                score: r.score,
                timestamp: r.timestamp,
                source: r.source,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(target: "fng", error = %e, "manual run failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RunErr {
                    ok: false,
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
