//! Wallet data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::errors::{WalletError, WalletResult};
use crate::money::Money;

/// Wallet ID type
pub type WalletId = Uuid;

/// Wallet model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Wallet {
    /// A not-yet-persisted wallet created now with the given opening balance.
    pub fn new(id: WalletId, balance: Money) -> Self {
        Self {
            id,
            balance,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationKind {
    Deposit,
    Withdraw,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Deposit => "DEPOSIT",
            OperationKind::Withdraw => "WITHDRAW",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(OperationKind::Deposit),
            "WITHDRAW" => Ok(OperationKind::Withdraw),
            other => Err(WalletError::InvalidOperationKind(other.to_string())),
        }
    }
}

/// A single deposit or withdrawal against one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletOperation {
    pub wallet_id: WalletId,
    pub kind: OperationKind,
    pub amount: Money,
}

impl WalletOperation {
    /// Build an operation from a wire-level operation type.
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidOperationKind` - `kind` is not `DEPOSIT` or `WITHDRAW`
    /// * `WalletError::InvalidAmount` - `amount` is not strictly positive
    pub fn new(wallet_id: WalletId, kind: &str, amount: Money) -> WalletResult<Self> {
        let operation = Self {
            wallet_id,
            kind: kind.parse()?,
            amount,
        };
        operation.validate()?;
        Ok(operation)
    }

    pub fn deposit(wallet_id: WalletId, amount: Money) -> Self {
        Self {
            wallet_id,
            kind: OperationKind::Deposit,
            amount,
        }
    }

    pub fn withdraw(wallet_id: WalletId, amount: Money) -> Self {
        Self {
            wallet_id,
            kind: OperationKind::Withdraw,
            amount,
        }
    }

    /// Reject amounts that are zero or negative.
    pub fn validate(&self) -> WalletResult<()> {
        if !self.amount.is_positive() {
            return Err(WalletError::InvalidAmount(self.amount.to_string()));
        }
        Ok(())
    }
}
