//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Watcher (items detected)
//! - Downloads (counts, duration)
//! - Worker runs (counts, duration)
//! - Composite workflows and uploads

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

/// New items detected by the watcher.
pub static ITEMS_DETECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("drobe_items_detected_total", "Total new items detected").unwrap()
});

/// Downloads by result.
pub static FETCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("drobe_fetches_total", "Total download attempts"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Download duration in seconds.
pub static FETCH_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("drobe_fetch_duration_seconds", "Duration of downloads")
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
    )
    .unwrap()
});

/// Worker runs by result.
pub static WORKER_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("drobe_worker_runs_total", "Total external worker runs"),
        &["result"], // "success", "failed", "timeout"
    )
    .unwrap()
});

/// Worker run duration in seconds.
pub static WORKER_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "drobe_worker_duration_seconds",
            "Duration of external worker runs",
        )
        .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 300.0, 1800.0]),
    )
    .unwrap()
});

/// Composite workflow invocations by result.
pub static COMPOSITE_WORKFLOWS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "drobe_composite_workflows_total",
            "Total composite workflow invocations",
        ),
        // "success", "invalid_input", "no_input", "processing_failed",
        // "upload_failed", "io_error"
        &["result"],
    )
    .unwrap()
});

/// Result uploads by result.
pub static UPLOADS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("drobe_uploads_total", "Total result uploads"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(ITEMS_DETECTED.clone()),
        Box::new(FETCHES_TOTAL.clone()),
        Box::new(FETCH_DURATION.clone()),
        Box::new(WORKER_RUNS_TOTAL.clone()),
        Box::new(WORKER_DURATION.clone()),
        Box::new(COMPOSITE_WORKFLOWS_TOTAL.clone()),
        Box::new(UPLOADS_TOTAL.clone()),
    ]
}
