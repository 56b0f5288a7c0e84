// tests/common/mod.rs
//
// Local stand-ins for the outside world: each helper binds an Axum server on
// 127.0.0.1:0 and returns its base URL.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};

pub const CNN_FIXTURE: &str = include_str!("../fixtures/cnn_graphdata.json");

pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

pub fn fng_body(score: f64, timestamp: &str) -> String {
    json!({
        "fear_and_greed": {
            "score": score,
            "rating": "neutral",
            "timestamp": timestamp
        }
    })
    .to_string()
}

/// Origin that answers `GET /data` with a fixed status and body.
pub async fn origin(status: StatusCode, body: impl Into<String>) -> String {
    let body = body.into();
    let router = Router::new().route(
        "/data",
        get(move || {
            let body = body.clone();
            async move { (status, body) }
        }),
    );
    format!("{}/data", serve(router).await)
}

/// Origin that never answers within any sane timeout.
pub async fn slow_origin(delay: Duration) -> String {
    let router = Router::new().route(
        "/data",
        get(move || async move {
            tokio::time::sleep(delay).await;
            fng_body(1.0, "too-late")
        }),
    );
    format!("{}/data", serve(router).await)
}

/// Origin that records the request headers it saw.
pub async fn header_echo_origin(seen: Arc<Mutex<Vec<HeaderMap>>>) -> String {
    let router = Router::new().route(
        "/data",
        get(move |headers: HeaderMap| {
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(headers);
                fng_body(42.0, "2024-05-01T00:00:00Z")
            }
        }),
    );
    format!("{}/data", serve(router).await)
}

#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Google API stand-in: records every request and answers `status`.
pub async fn capture_server(status: StatusCode, log: Arc<Mutex<Vec<Captured>>>) -> String {
    let router = Router::new().fallback(
        move |uri: axum::http::Uri, headers: HeaderMap, body: Bytes| {
            let log = log.clone();
            async move {
                let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
                log.lock().unwrap().push(Captured {
                    path: uri.path().to_string(),
                    authorization: headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body,
                });
                (status, "{}")
            }
        },
    );
    serve(router).await
}
