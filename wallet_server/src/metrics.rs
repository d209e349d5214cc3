//! Prometheus metrics for monitoring wallet server health and throughput.
//!
//! Metrics are exposed in Prometheus text format when `METRICS_BIND` is set.
//! Without an installed exporter the recording functions are no-ops.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts, duration, status codes
//! - **Wallet Metrics**: Operations by kind and outcome, insufficient-funds rejections
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use wallet_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/wallet", 200);
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use wallet_ledger::{
    Money, Wallet, WalletError, WalletOperation,
    wallet::{LogObserver, OperationObserver},
};

/// Initialize Prometheus metrics exporter.
///
/// Sets up a Prometheus scrape endpoint on the specified address.
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Arguments
///
/// - `addr`: Address to bind the metrics server to (e.g., `0.0.0.0:9090`)
///
/// # Returns
///
/// Result indicating success or error message
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// Increments the total HTTP request counter with method, path, and status labels.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

/// Route label for requests that matched no route, so unknown paths share
/// one series.
pub const UNMATCHED_ROUTE: &str = "unmatched";

// ============================================================================
// Wallet Metrics
// ============================================================================

/// Increment wallet operations counter.
pub fn wallet_operations_total(kind: &str, outcome: &str) {
    metrics::counter!("wallet_operations_total",
        "kind" => kind.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Increment insufficient-funds rejections counter.
pub fn wallet_insufficient_funds_total() {
    metrics::counter!("wallet_insufficient_funds_total").increment(1);
}

/// Operation observer that logs and records metrics.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    log: LogObserver,
}

impl OperationObserver for MetricsObserver {
    fn operation_applied(&self, operation: &WalletOperation, wallet: &Wallet) {
        self.log.operation_applied(operation, wallet);
        wallet_operations_total(operation.kind.as_str(), "applied");
    }

    fn insufficient_funds(&self, operation: &WalletOperation, available: Money) {
        self.log.insufficient_funds(operation, available);
        wallet_operations_total(operation.kind.as_str(), "insufficient_funds");
        wallet_insufficient_funds_total();
    }

    fn mutation_failed(&self, operation: &WalletOperation, error: &WalletError) {
        self.log.mutation_failed(operation, error);
        wallet_operations_total(operation.kind.as_str(), "failed");
    }
}
