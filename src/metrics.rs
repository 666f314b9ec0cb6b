// src/metrics.rs
//! Prometheus recorder setup. The exposition itself is served by the
//! API router (`GET /metrics`), which renders from the handle returned
//! here.

use metrics::gauge;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder and seed the static gauges.
/// Call once at boot, before the pipeline or API record anything.
pub fn install_recorder(top_k: usize) -> PrometheusHandle {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("prometheus: install recorder");

    gauge!("newsletter_top_k").set(top_k as f64);

    handle
}
