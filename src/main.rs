//! Subscription service binary entrypoint.
//! Boots the Axum HTTP server with the subscribe/unsubscribe/stats
//! routes and the Prometheus `/metrics` endpoint.
//!
//! The newsletter itself is generated by `src/bin/send_newsletter.rs`.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use techsum_newsletter::api::{self, AppState};
use techsum_newsletter::config::NewsletterConfig;
use techsum_newsletter::metrics;
use techsum_newsletter::subscribers::SubscriberStore;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - NEWSLETTER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWSLETTER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("techsum_newsletter=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = NewsletterConfig::load().expect("Failed to load newsletter config");
    let store = SubscriberStore::from_env().expect("Failed to open subscriber store");

    let handle = metrics::install_recorder(cfg.top_k);
    let state = AppState {
        store: Arc::new(store),
        metrics: Some(handle),
    };

    Ok(api::create_router(state).into())
}
