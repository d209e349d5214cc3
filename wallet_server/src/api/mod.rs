//! HTTP API for the wallet server.
//!
//! # Modules
//!
//! - [`wallets`]: Wallet operations, balance lookups and provisioning
//! - [`request_id`]: Request ID propagation, request logging and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                       - Health check
//! POST /api/v1/wallet                - Apply a deposit or withdrawal
//! POST /api/v1/wallets               - Provision a wallet
//! GET  /api/v1/wallets/{wallet_id}   - Get wallet balance
//! ```
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallet_ledger::{WalletProcessor, db::MemoryWalletLedger};
//! use wallet_server::api::{AppState, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let processor = WalletProcessor::new(Arc::new(MemoryWalletLedger::new()));
//! let app = create_router(AppState::new(processor));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod request_id;
pub mod wallets;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use wallet_ledger::WalletProcessor;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<WalletProcessor>,
}

impl AppState {
    pub fn new(processor: WalletProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Endpoint Summary
///
/// ```text
/// GET  /health                         - Health check
/// POST /api/v1/wallet                  - Deposit or withdraw
/// POST /api/v1/wallets                 - Provision a wallet
/// GET  /api/v1/wallets/{wallet_id}     - Get wallet
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/wallet", post(wallets::apply_operation))
        .route("/wallets", post(wallets::create_wallet))
        .route("/wallets/{wallet_id}", get(wallets::get_wallet));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` when the wallet store answers, `503 Service Unavailable`
/// otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","database":true,"version":"1.0.0","timestamp":"2026-10-19T10:30:00Z"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_healthy = match state.processor.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            false
        }
    };

    let status_code = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if db_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
