// src/core/metrics.rs

//! Defines and registers Prometheus metrics for server monitoring.
//!
//! This module uses `lazy_static` to ensure that metrics are registered only once
//! globally for the entire application lifecycle.

use lazy_static::lazy_static;
use prometheus::{
    CounterVec, HistogramVec, TextEncoder, register_counter_vec, register_histogram_vec,
};

lazy_static! {
    // --- Action Counters ---
    /// Requests handled per route, labeled with `ok` or the error kind.
    pub static ref ACTION_REQUESTS_TOTAL: CounterVec =
        register_counter_vec!("actionchain_requests_total", "Total number of action requests handled, labeled by route and outcome.", &["route", "outcome"]).unwrap();


    // --- Ledger Metrics ---
    /// JSON-RPC calls issued to the ledger, labeled by method and result.
    pub static ref LEDGER_REQUESTS_TOTAL: CounterVec =
        register_counter_vec!("actionchain_ledger_requests_total", "Total number of ledger RPC requests, labeled by method and result.", &["method", "result"]).unwrap();
    /// Latency of ledger JSON-RPC calls, including timeouts.
    pub static ref LEDGER_LATENCY_SECONDS: HistogramVec =
        register_histogram_vec!("actionchain_ledger_latency_seconds", "Latency of ledger RPC requests in seconds.", &["method"]).unwrap();
}

/// Gathers all registered metrics and encodes them in the Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap_or_default()
}
