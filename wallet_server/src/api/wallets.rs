//! Wallet API handlers.
//!
//! This module provides HTTP REST endpoints for wallet operations:
//! - Applying deposits and withdrawals
//! - Reading a wallet's balance
//! - Provisioning a wallet with an opening balance
//!
//! Amounts are accepted as JSON numbers or decimal strings and are always
//! returned as strings with two fractional digits.
//!
//! # Examples
//!
//! Deposit into a wallet (created on first deposit):
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/wallet \
//!   -H "Content-Type: application/json" \
//!   -d '{"walletId": "5f0c6d1e-8d6a-4b53-9a5e-3c1f2b7d9e10", "operationType": "DEPOSIT", "amount": 500}'
//! ```
//!
//! Read the balance:
//! ```bash
//! curl http://localhost:8080/api/v1/wallets/5f0c6d1e-8d6a-4b53-9a5e-3c1f2b7d9e10
//! ```

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wallet_ledger::{Money, Wallet, WalletError, WalletOperation};

use super::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOperationRequest {
    pub wallet_id: String,
    pub operation_type: String,
    pub amount: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub wallet_id: String,
    #[serde(default)]
    pub balance: Option<Money>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub wallet_id: Uuid,
    pub balance: Money,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    pub id: Uuid,
    pub balance: Money,
}

impl From<&Wallet> for WalletResponse {
    fn from(wallet: &Wallet) -> Self {
        Self {
            id: wallet.id,
            balance: wallet.balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a wallet error to its HTTP status and client-safe body.
pub fn error_response(err: &WalletError) -> ApiError {
    let status = if err.is_store_error() || matches!(err, WalletError::BalanceOverflow) {
        tracing::error!(error = %err, "Wallet store failure");
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        match err {
            WalletError::WalletNotFound(_) => StatusCode::NOT_FOUND,
            WalletError::DuplicateWallet(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Parse a wallet ID, rejecting the nil UUID.
fn parse_wallet_id(raw: &str) -> Result<Uuid, ApiError> {
    match Uuid::parse_str(raw.trim()) {
        Ok(id) if id.is_nil() => Err(bad_request("Wallet ID must not be nil")),
        Ok(id) => Ok(id),
        Err(_) => Err(bad_request(format!("Invalid wallet ID: {raw}"))),
    }
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request(format!("Invalid request body: {}", rejection.body_text())))
}

/// Apply a deposit or withdrawal.
///
/// # Request Body
///
/// ```json
/// {
///   "walletId": "5f0c6d1e-8d6a-4b53-9a5e-3c1f2b7d9e10",
///   "operationType": "WITHDRAW",
///   "amount": "300.00"
/// }
/// ```
///
/// # Response
///
/// Returns `200 OK` with the new balance:
/// ```json
/// { "walletId": "5f0c6d1e-8d6a-4b53-9a5e-3c1f2b7d9e10", "balance": "1200.00" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, invalid ID, operation type or amount, or insufficient funds
/// - `404 Not Found`: Withdrawal from a wallet that doesn't exist
/// - `500 Internal Server Error`: Database failure or balance overflow
pub async fn apply_operation(
    State(state): State<AppState>,
    payload: Result<Json<WalletOperationRequest>, JsonRejection>,
) -> Result<Json<OperationResponse>, ApiError> {
    let request = json_body(payload)?;
    let wallet_id = parse_wallet_id(&request.wallet_id)?;

    if request.operation_type.trim().is_empty() {
        return Err(bad_request("Operation type is required"));
    }

    let operation = WalletOperation::new(wallet_id, &request.operation_type, request.amount)
        .map_err(|e| error_response(&e))?;

    let wallet = state
        .processor
        .apply(&operation)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(OperationResponse {
        wallet_id: wallet.id,
        balance: wallet.balance,
    }))
}

/// Get a wallet's balance.
///
/// # Path Parameters
///
/// - `wallet_id`: Wallet UUID
///
/// # Errors
///
/// - `400 Bad Request`: Invalid or nil wallet ID
/// - `404 Not Found`: Wallet doesn't exist
pub async fn get_wallet(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<WalletResponse>, ApiError> {
    let wallet_id = parse_wallet_id(&wallet_id)?;

    let wallet = state
        .processor
        .get_wallet(wallet_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(WalletResponse::from(&wallet)))
}

/// Provision a wallet with an opening balance (zero when omitted).
///
/// # Errors
///
/// - `400 Bad Request`: Invalid ID or negative balance
/// - `409 Conflict`: Wallet already exists
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletResponse>), ApiError> {
    let request = json_body(payload)?;
    let wallet_id = parse_wallet_id(&request.wallet_id)?;

    let balance = request.balance.unwrap_or(Money::ZERO);
    if balance.is_negative() {
        return Err(error_response(&WalletError::InvalidAmount(balance.to_string())));
    }

    let wallet = Wallet::new(wallet_id, balance);
    state
        .processor
        .create_wallet(&wallet)
        .await
        .map_err(|e| error_response(&e))?;

    tracing::info!(wallet_id = %wallet.id, balance = %wallet.balance, "Wallet provisioned");

    Ok((StatusCode::CREATED, Json(WalletResponse::from(&wallet))))
}
