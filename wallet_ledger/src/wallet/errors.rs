//! Wallet error types.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::db::timeouts::TimeoutError;
use crate::money::Money;

/// PostgreSQL `numeric_value_out_of_range`.
const SQLSTATE_NUMERIC_OUT_OF_RANGE: &str = "22003";

/// PostgreSQL `unique_violation`.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// Wallet errors
#[derive(Debug, Error)]
pub enum WalletError {
    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Database statement did not finish in time
    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    /// Unparseable or non-positive amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Operation type outside the supported set
    #[error("Invalid operation type: {0}")]
    InvalidOperationKind(String),

    /// Wallet not found
    #[error("Wallet not found: {0}")]
    WalletNotFound(Uuid),

    /// Wallet already provisioned
    #[error("Wallet already exists: {0}")]
    DuplicateWallet(Uuid),

    /// Withdrawal exceeds the current balance
    ///
    /// `available` is read after the rejected debit, so a transfer committed
    /// in between can make it differ from the balance that failed the check.
    #[error("Insufficient funds in wallet {wallet_id}: available {available}, required {required}")]
    InsufficientFunds {
        wallet_id: Uuid,
        available: Money,
        required: Money,
    },

    /// Balance would leave the 64-bit minor-unit range
    #[error("Balance overflow")]
    BalanceOverflow,
}

impl WalletError {
    /// Whether the error came from the storage layer rather than from the
    /// request or the wallet state.
    pub fn is_store_error(&self) -> bool {
        matches!(self, WalletError::Database(_) | WalletError::Timeout(_))
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database errors are sanitized to prevent information disclosure about
    /// the internal system structure, and wallet IDs are redacted.
    pub fn client_message(&self) -> String {
        match self {
            WalletError::Database(_) | WalletError::Timeout(_) => {
                "Internal server error".to_string()
            }
            WalletError::WalletNotFound(_) => "Wallet not found".to_string(),
            WalletError::DuplicateWallet(_) => "Wallet already exists".to_string(),
            WalletError::InsufficientFunds { .. } => "Insufficient funds".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<sqlx::Error> for WalletError {
    fn from(err: sqlx::Error) -> Self {
        let code = match &err {
            sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
            _ => None,
        };

        match code.as_deref() {
            Some(SQLSTATE_NUMERIC_OUT_OF_RANGE) => WalletError::BalanceOverflow,
            _ => WalletError::Database(err),
        }
    }
}

impl From<TimeoutError> for WalletError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Timeout(duration) => WalletError::Timeout(duration),
            TimeoutError::Database(e) => e.into(),
        }
    }
}

/// Maps a unique violation on insert to [`WalletError::DuplicateWallet`].
pub(crate) fn map_insert_error(wallet_id: Uuid, err: WalletError) -> WalletError {
    match &err {
        WalletError::Database(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION) =>
        {
            WalletError::DuplicateWallet(wallet_id)
        }
        _ => err,
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_internals() {
        let err = WalletError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = WalletError::Timeout(Duration::from_secs(5));
        assert_eq!(err.client_message(), "Internal server error");

        let id = Uuid::new_v4();
        let err = WalletError::WalletNotFound(id);
        assert!(!err.client_message().contains(&id.to_string()));
    }

    #[test]
    fn test_client_message_passes_validation_errors() {
        let err = WalletError::InvalidOperationKind("TRANSFER".to_string());
        assert_eq!(err.client_message(), "Invalid operation type: TRANSFER");
    }

    #[test]
    fn test_insufficient_funds_display() {
        let err = WalletError::InsufficientFunds {
            wallet_id: Uuid::nil(),
            available: Money::from_minor(100_000),
            required: Money::from_minor(150_000),
        };
        let msg = err.to_string();
        assert!(msg.contains("available 1000.00"));
        assert!(msg.contains("required 1500.00"));
        assert_eq!(err.client_message(), "Insufficient funds");
    }

    #[test]
    fn test_store_error_classification() {
        assert!(WalletError::Database(sqlx::Error::PoolTimedOut).is_store_error());
        assert!(WalletError::Timeout(Duration::from_secs(1)).is_store_error());
        assert!(!WalletError::WalletNotFound(Uuid::nil()).is_store_error());
        assert!(!WalletError::BalanceOverflow.is_store_error());
        assert!(!WalletError::DuplicateWallet(Uuid::nil()).is_store_error());
    }

    #[test]
    fn test_timeout_error_conversion() {
        let err: WalletError = TimeoutError::Timeout(Duration::from_secs(5)).into();
        assert!(matches!(err, WalletError::Timeout(d) if d.as_secs() == 5));

        let err: WalletError = TimeoutError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, WalletError::Database(sqlx::Error::PoolClosed)));
    }
}
