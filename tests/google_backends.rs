// tests/google_backends.rs
//
// Firestore and FCM clients against a local capture server: request path,
// bearer token, body shape, and error mapping.

mod common;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use fng_broadcaster::auth::TokenSource;
use fng_broadcaster::broadcast::{Broadcaster, FcmBroadcaster};
use fng_broadcaster::error::{PersistenceError, PublishError};
use fng_broadcaster::store::{FirestoreStore, ReadingStore};
use fng_broadcaster::{SentimentReading, SourceTag};

fn reading() -> SentimentReading {
    SentimentReading {
        score: 55.3,
        timestamp: "2024-01-01T12:00:00Z".into(),
        source: SourceTag::Primary,
    }
}

fn token() -> TokenSource {
    TokenSource::Static("test-token".into())
}

#[tokio::test]
async fn firestore_commit_merges_three_fields_with_server_time() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let base = common::capture_server(StatusCode::OK, log.clone()).await;

    let store = FirestoreStore::new(reqwest::Client::new(), token(), "demo-proj").with_base_url(&base);
    store.persist(&reading()).await.expect("commit ok");

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    let c = &log[0];
    assert_eq!(
        c.path,
        "/projects/demo-proj/databases/(default)/documents:commit"
    );
    assert_eq!(c.authorization.as_deref(), Some("Bearer test-token"));

    let w = &c.body["writes"][0];
    assert_eq!(
        w["update"]["name"],
        "projects/demo-proj/databases/(default)/documents/fng/latest"
    );
    assert_eq!(w["update"]["fields"]["score"]["doubleValue"], 55.3);
    assert_eq!(
        w["update"]["fields"]["timestamp"]["stringValue"],
        "2024-01-01T12:00:00Z"
    );
    assert_eq!(w["update"]["fields"]["source"]["stringValue"], "cnn");
    assert_eq!(w["updateTransforms"][0]["setToServerValue"], "REQUEST_TIME");
}

#[tokio::test]
async fn firestore_rejection_maps_to_persistence_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let base = common::capture_server(StatusCode::FORBIDDEN, log).await;

    let store = FirestoreStore::new(reqwest::Client::new(), token(), "demo-proj").with_base_url(&base);
    match store.persist(&reading()).await {
        Err(PersistenceError::Rejected { status, .. }) => assert_eq!(status, 403),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn firestore_unreachable_maps_to_persistence_error() {
    // Port 9 on localhost: nothing listens there in CI.
    let store = FirestoreStore::new(reqwest::Client::new(), token(), "demo-proj")
        .with_base_url("http://127.0.0.1:9/v1");
    assert!(matches!(
        store.persist(&reading()).await,
        Err(PersistenceError::Unreachable(_))
    ));
}

#[tokio::test]
async fn fcm_send_is_topic_addressed_and_silent() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let base = common::capture_server(StatusCode::OK, log.clone()).await;

    let push = FcmBroadcaster::new(reqwest::Client::new(), token(), "demo-proj").with_base_url(&base);
    push.publish(&reading()).await.expect("send ok");

    let log = log.lock().unwrap();
    let c = &log[0];
    assert_eq!(c.path, "/projects/demo-proj/messages:send");
    assert_eq!(c.authorization.as_deref(), Some("Bearer test-token"));

    let m = &c.body["message"];
    assert_eq!(m["topic"], "fng-all");
    assert_eq!(m["data"]["score"], "55.3");
    assert_eq!(m["data"]["timestamp"], "2024-01-01T12:00:00Z");
    assert_eq!(m["data"]["source"], "cnn");
    assert!(m.get("notification").is_none());
    assert_eq!(m["android"]["priority"], "high");
    assert_eq!(m["apns"]["headers"]["apns-push-type"], "background");
    assert_eq!(m["apns"]["payload"]["aps"]["content-available"], 1);
}

#[tokio::test]
async fn fcm_rejection_maps_to_publish_error() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let base = common::capture_server(StatusCode::BAD_REQUEST, log).await;

    let push = FcmBroadcaster::new(reqwest::Client::new(), token(), "demo-proj")
        .with_base_url(&base)
        .with_topic("other-topic");
    match push.publish(&reading()).await {
        Err(PublishError::Rejected { status, .. }) => assert_eq!(status, 400),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn metadata_token_request_gives_up_on_a_hung_server() {
    let url = common::slow_origin(std::time::Duration::from_secs(60)).await;
    let src = TokenSource::Metadata {
        client: reqwest::Client::new(),
        url,
    };

    let started = std::time::Instant::now();
    let err = src.bearer().await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.contains("metadata token request"), "got: {err}");
    assert!(elapsed >= fng_broadcaster::auth::METADATA_TIMEOUT);
    assert!(elapsed < std::time::Duration::from_secs(15), "took {elapsed:?}");
}
