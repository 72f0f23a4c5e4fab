//! Prometheus request metrics, exposed at `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;

/// Global handle; probes are left out so they do not drown real traffic.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("portal")
        .endpoint("/metrics")
        .exclude("/api/healthz")
        .build()
        .expect("metrics builder")
});
