//! Notifications about processed wallet operations.
//!
//! The processor reports rejected and failed mutations through an injected
//! [`OperationObserver`] instead of writing to a global logger, so callers
//! decide where notices go and tests can capture them.

use super::{
    errors::WalletError,
    models::{Wallet, WalletOperation},
};
use crate::money::Money;

/// Receives notices about operations handled by
/// [`WalletProcessor`](super::WalletProcessor). All methods default to no-ops.
pub trait OperationObserver: Send + Sync {
    /// The operation was applied and `wallet` is the persisted result.
    fn operation_applied(&self, _operation: &WalletOperation, _wallet: &Wallet) {}

    /// A withdrawal was rejected because the balance was below the amount.
    fn insufficient_funds(&self, _operation: &WalletOperation, _available: Money) {}

    /// The ledger failed to apply the operation.
    fn mutation_failed(&self, _operation: &WalletOperation, _error: &WalletError) {}
}

/// Observer writing notices through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl OperationObserver for LogObserver {
    fn operation_applied(&self, operation: &WalletOperation, wallet: &Wallet) {
        log::debug!(
            "{} of {} applied to wallet {}, balance {}",
            operation.kind,
            operation.amount,
            wallet.id,
            wallet.balance
        );
    }

    fn insufficient_funds(&self, operation: &WalletOperation, available: Money) {
        log::warn!(
            "Insufficient funds detected for wallet {}: available {}, required {}",
            operation.wallet_id,
            available,
            operation.amount
        );
    }

    fn mutation_failed(&self, operation: &WalletOperation, error: &WalletError) {
        log::error!(
            "{} of {} on wallet {} failed: {}",
            operation.kind,
            operation.amount,
            operation.wallet_id,
            error
        );
    }
}
