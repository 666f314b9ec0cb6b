// tests/api_http.rs
//
// HTTP-level tests for the subscription API Router without opening
// sockets; the router is exercised via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /api/health
// - POST /api/subscribe (validation + honeypot)
// - POST /api/unsubscribe
// - GET /metrics (Prometheus exposition)
// - GET /api/stats (admin token guard)

use std::sync::Arc;

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use techsum_newsletter::api::{self, AppState, ENV_ADMIN_TOKEN};
use techsum_newsletter::subscribers::SubscriberStore;

const BODY_LIMIT: usize = 1024 * 1024;

fn test_router() -> (tempfile::TempDir, Arc<SubscriberStore>, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(
        SubscriberStore::open(dir.path().join("subscribers.json")).expect("open store"),
    );
    let router = api::create_router(AppState {
        store: store.clone(),
        metrics: None,
    });
    (dir, store, router)
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request")
}

async fn json_body(resp: axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json body")
}

#[tokio::test]
async fn health_reports_ok_with_a_timestamp() {
    let (_dir, _store, app) = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .expect("build GET /api/health");

    let resp = app.oneshot(req).await.expect("oneshot /api/health");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["ok"], json!(true));
    assert!(v.get("timestamp").is_some(), "missing 'timestamp'");
}

#[tokio::test]
async fn subscribe_stores_the_lowercased_email() {
    let (_dir, store, app) = test_router();

    let payload = json!({ "email": "Alice@Example.com", "tags": ["preview"] });
    let resp = app
        .oneshot(post_json("/api/subscribe", &payload))
        .await
        .expect("oneshot subscribe");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["ok"], json!(true));

    assert_eq!(store.active_recipients(&[]), vec!["alice@example.com"]);
}

#[tokio::test]
async fn subscribe_rejects_invalid_emails() {
    let (_dir, store, app) = test_router();

    let resp = app
        .oneshot(post_json("/api/subscribe", &json!({ "email": "not-an-email" })))
        .await
        .expect("oneshot subscribe");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.stats().total, 0);
}

#[tokio::test]
async fn honeypot_submissions_succeed_without_storing() {
    let (_dir, store, app) = test_router();

    let payload = json!({ "email": "bot@example.com", "website": "https://spam.example" });
    let resp = app
        .oneshot(post_json("/api/subscribe", &payload))
        .await
        .expect("oneshot subscribe");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.stats().total, 0, "honeypot hit must not persist");
}

#[tokio::test]
async fn unsubscribe_marks_the_subscriber_inactive() {
    let (_dir, store, app) = test_router();
    store.subscribe("carol@example.com", vec![]).unwrap();

    let resp = app
        .oneshot(post_json(
            "/api/unsubscribe",
            &json!({ "email": "carol@example.com" }),
        ))
        .await
        .expect("oneshot unsubscribe");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.stats().active, 0);
    assert_eq!(store.stats().total, 1);
}

#[tokio::test]
async fn metrics_route_serves_the_prometheus_exposition() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(
        SubscriberStore::open(dir.path().join("subscribers.json")).expect("open store"),
    );
    // Build a recorder without installing it globally so parallel
    // tests cannot race on the process-wide recorder slot.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let app = api::create_router(AppState {
        store,
        metrics: Some(recorder.handle()),
    });

    let req = Request::builder()
        .method("GET")
        .uri("/metrics")
        .body(Body::empty())
        .expect("build GET /metrics");
    let resp = app.oneshot(req).await.expect("oneshot /metrics");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[serial_test::serial]
#[tokio::test]
async fn stats_requires_the_admin_token() {
    std::env::remove_var(ENV_ADMIN_TOKEN);
    let (_dir, _store, app) = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/api/stats")
        .body(Body::empty())
        .expect("build GET /api/stats");
    let resp = app.oneshot(req).await.expect("oneshot stats");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[serial_test::serial]
#[tokio::test]
async fn stats_returns_counts_for_the_right_token() {
    std::env::set_var(ENV_ADMIN_TOKEN, "sekret");
    let (_dir, store, app) = test_router();
    store.subscribe("a@example.com", vec![]).unwrap();
    store.subscribe("b@example.com", vec![]).unwrap();
    store.unsubscribe("b@example.com").unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/api/stats")
        .header("x-admin-token", "sekret")
        .body(Body::empty())
        .expect("build GET /api/stats");
    let resp = app.oneshot(req).await.expect("oneshot stats");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = json_body(resp).await;
    assert_eq!(v["total"], json!(2));
    assert_eq!(v["active"], json!(1));
    assert_eq!(v["inactive"], json!(1));
    assert_eq!(v["recent"].as_array().map(Vec::len), Some(2));

    std::env::remove_var(ENV_ADMIN_TOKEN);
}
