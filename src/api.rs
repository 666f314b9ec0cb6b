// src/api.rs
//! Public subscription API: health, subscribe, unsubscribe, an
//! admin-only stats endpoint, and the Prometheus exposition.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::subscribers::SubscriberStore;

pub const ENV_ADMIN_TOKEN: &str = "ADMIN_TOKEN";
const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SubscriberStore>,
    /// Prometheus handle from `metrics::install_recorder`; None leaves
    /// `/metrics` serving an empty exposition (tests, tools).
    pub metrics: Option<PrometheusHandle>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/subscribe", post(subscribe))
        .route("/api/unsubscribe", post(unsubscribe))
        .route("/api/stats", get(stats))
        .route("/metrics", get(prometheus))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn is_email(v: &str) -> bool {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
        .is_match(&v.to_lowercase())
}

#[derive(serde::Deserialize)]
struct SubscribeReq {
    #[serde(default)]
    email: String,
    #[serde(default)]
    tags: Vec<String>,
    /// Honeypot field: humans never fill it.
    #[serde(default)]
    website: String,
}

#[derive(serde::Deserialize)]
struct UnsubscribeReq {
    #[serde(default)]
    email: String,
    #[serde(default)]
    website: String,
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "timestamp": chrono::Utc::now().to_rfc3339() }))
}

async fn prometheus(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .unwrap_or_default()
}

async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeReq>,
) -> (StatusCode, Json<Value>) {
    if !body.website.is_empty() {
        // Bot filled the honeypot; pretend success.
        return (StatusCode::OK, Json(json!({ "ok": true })));
    }
    if !is_email(&body.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid email" })),
        );
    }
    match state.store.subscribe(&body.email, body.tags) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!(error = ?e, "subscribe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
        }
    }
}

async fn unsubscribe(
    State(state): State<AppState>,
    Json(body): Json<UnsubscribeReq>,
) -> (StatusCode, Json<Value>) {
    if !body.website.is_empty() {
        return (StatusCode::OK, Json(json!({ "ok": true })));
    }
    if !is_email(&body.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid email" })),
        );
    }
    match state.store.unsubscribe(&body.email) {
        Ok(_) => (StatusCode::OK, Json(json!({ "ok": true }))),
        Err(e) => {
            tracing::error!(error = ?e, "unsubscribe failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
        }
    }
}

/// Requires `x-admin-token` matching $ADMIN_TOKEN; with no token
/// configured the endpoint stays closed.
async fn stats(State(state): State<AppState>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let expected = std::env::var(ENV_ADMIN_TOKEN).unwrap_or_default();
    let presented = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if expected.is_empty() || presented != expected {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "ok": false, "error": "Authentication required" })),
        );
    }

    let s = state.store.stats();
    let recent: Vec<Value> = state
        .store
        .all()
        .into_iter()
        .map(|sub| {
            json!({
                "email": sub.email,
                "status": sub.status,
                "tags": sub.tags,
                "createdAt": sub.created_at,
                "updatedAt": sub.updated_at,
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "ok": true,
            "total": s.total,
            "active": s.active,
            "inactive": s.inactive,
            "recent": recent,
        })),
    )
}
