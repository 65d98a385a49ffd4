use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

use crate::dataset::LoadStats;
use crate::report::Report;

/// Metric name prefix for all dashboard metrics
const PREFIX: &str = "dashboard";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Dataset Metrics
    pub static ref DATASET_ROWS: GaugeVec = GaugeVec::new(
        Opts::new(format!("{PREFIX}_dataset_rows"), "Rows seen while loading the dataset"),
        &["kind"]
    ).expect("Failed to create dataset_rows metric");

    // Report Metrics
    pub static ref REPORTS_COMPUTED_TOTAL: IntCounter = IntCounter::new(
        format!("{PREFIX}_reports_computed_total"),
        "Total number of dashboard views computed"
    ).expect("Failed to create reports_computed_total metric");

    pub static ref REPORTS_EMPTY_TOTAL: IntCounter = IntCounter::new(
        format!("{PREFIX}_reports_empty_total"),
        "Dashboard views whose filtered record set was empty"
    ).expect("Failed to create reports_empty_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(DATASET_ROWS.clone()));
    let _ = REGISTRY.register(Box::new(REPORTS_COMPUTED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(REPORTS_EMPTY_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn init_dataset_metrics(stats: &LoadStats) {
    DATASET_ROWS
        .with_label_values(&["total"])
        .set(stats.total_rows as f64);
    DATASET_ROWS
        .with_label_values(&["kept"])
        .set(stats.kept_rows() as f64);
    DATASET_ROWS
        .with_label_values(&["dropped_invalid_date"])
        .set(stats.dropped_invalid_dates as f64);
    DATASET_ROWS
        .with_label_values(&["malformed"])
        .set(stats.malformed_rows as f64);

    tracing::info!(
        "Dataset metrics initialized: {} kept, {} dropped",
        stats.kept_rows(),
        stats.dropped_invalid_dates
    );
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_report(report: &Report) {
    REPORTS_COMPUTED_TOTAL.inc();
    if report.is_empty {
        REPORTS_EMPTY_TOTAL.inc();
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
