//! Metrics and observability utilities
//!
//! Prometheus-style metrics for ledger operations and the HTTP surface,
//! with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all CiteLedger metrics
pub const METRICS_PREFIX: &str = "citeledger";

/// Histogram buckets for ledger operation latency (in seconds).
/// Operations are in-memory; anything above a millisecond means lock contention.
pub const LEDGER_LATENCY_BUCKETS: &[f64] = &[
    0.00001, // 10us
    0.00005, // 50us
    0.0001,  // 100us
    0.0005,  // 500us
    0.001,   // 1ms
    0.005,   // 5ms
    0.010,   // 10ms
    0.050,   // 50ms
    0.100,   // 100ms
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_http_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_counter!(
        format!("{}_ledger_operations_total", METRICS_PREFIX),
        Unit::Count,
        "Ledger operations by name and outcome"
    );

    describe_histogram!(
        format!("{}_ledger_operation_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Ledger operation latency including lock wait"
    );

    describe_gauge!(
        format!("{}_citations_live", METRICS_PREFIX),
        Unit::Count,
        "Currently live citations"
    );

    describe_gauge!(
        format!("{}_citations_created_total", METRICS_PREFIX),
        Unit::Count,
        "Citations ever created (the id counter)"
    );

    tracing::info!("Metrics registered");
}

/// Tracks one ledger operation from start to outcome
pub struct OperationMetrics {
    start: Instant,
    operation: &'static str,
}

impl OperationMetrics {
    /// Start tracking an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Record completion; `outcome` is "ok" or an error label
    pub fn finish(self, outcome: &'static str) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_ledger_operations_total", METRICS_PREFIX),
            "operation" => self.operation,
            "outcome" => outcome
        )
        .increment(1);

        histogram!(
            format!("{}_ledger_operation_duration_seconds", METRICS_PREFIX),
            "operation" => self.operation
        )
        .record(duration);
    }
}

/// Helper to record HTTP request completion
pub fn record_request(method: &str, endpoint: &str, status: u16) {
    counter!(
        format!("{}_http_requests_total", METRICS_PREFIX),
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Helper to publish the ledger size gauges
pub fn record_ledger_size(live: usize, created: u64) {
    gauge!(format!("{}_citations_live", METRICS_PREFIX)).set(live as f64);
    gauge!(format!("{}_citations_created_total", METRICS_PREFIX)).set(created as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in LEDGER_LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_operation_metrics() {
        let metrics = OperationMetrics::start("add_citation");
        metrics.finish("ok");
        record_ledger_size(3, 5);
        record_request("POST", "/v1/citations", 201);
        // Just verify it runs without panic
    }
}
