//! Structured logging configuration.
//!
//! Provides `tracing` initialisation and helpers for the request and wallet
//! events the server records.

use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var. Records emitted by
/// the library through the `log` facade are forwarded to the same subscriber.
///
/// # Example
///
/// ```no_run
/// use wallet_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init(true);
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init(local: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // File and line locations only help during local development
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(local)
        .with_line_number(local);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log API request/response
///
/// Failed requests (status >= 400) are logged at error level.
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration` - Request duration
pub fn log_api_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let duration_ms = duration.as_millis() as u64;

    if status_code >= 400 {
        tracing::error!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "Request failed"
        );
    } else {
        tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            "API request completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_log_api_request() {
        // Just ensure it doesn't panic
        log_api_request("GET", "/api/v1/wallets/abc", 200, Duration::from_millis(45));
        log_api_request("POST", "/api/v1/wallet", 400, Duration::from_millis(120));
    }
}
