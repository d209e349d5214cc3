//! Wallet operation processor.

use std::sync::Arc;

use super::{
    errors::{WalletError, WalletResult},
    models::{Wallet, WalletId, WalletOperation},
    observer::{LogObserver, OperationObserver},
};
use crate::db::WalletLedger;

/// Validates wallet operations and applies them through a [`WalletLedger`].
///
/// The processor keeps no wallet state between calls. The insufficient-funds
/// rule for withdrawals is enforced by the ledger's conditional update, so a
/// balance can never be checked against one value and debited at another.
#[derive(Clone)]
pub struct WalletProcessor {
    ledger: Arc<dyn WalletLedger>,
    observer: Arc<dyn OperationObserver>,
}

impl WalletProcessor {
    /// Create a processor that reports through the `log` facade
    ///
    /// # Arguments
    ///
    /// * `ledger` - Storage for wallet rows
    pub fn new(ledger: Arc<dyn WalletLedger>) -> Self {
        Self::with_observer(ledger, Arc::new(LogObserver))
    }

    /// Create a processor with a custom observer
    pub fn with_observer(
        ledger: Arc<dyn WalletLedger>,
        observer: Arc<dyn OperationObserver>,
    ) -> Self {
        Self { ledger, observer }
    }

    /// Get a wallet by ID
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet with this ID
    pub async fn get_wallet(&self, wallet_id: WalletId) -> WalletResult<Wallet> {
        self.ledger.fetch(wallet_id).await
    }

    /// Apply a deposit or withdrawal
    ///
    /// # Arguments
    ///
    /// * `operation` - Operation to apply
    ///
    /// # Returns
    ///
    /// * `WalletResult<Wallet>` - Wallet with its updated balance
    ///
    /// # Errors
    ///
    /// * `WalletError::InvalidAmount` - Amount is zero or negative
    /// * `WalletError::WalletNotFound` - Withdrawal from a wallet that doesn't exist
    /// * `WalletError::InsufficientFunds` - Withdrawal exceeds the balance
    /// * `WalletError::BalanceOverflow` - Deposit would overflow the balance
    /// * `WalletError::Database` / `WalletError::Timeout` - Storage failure
    pub async fn apply(&self, operation: &WalletOperation) -> WalletResult<Wallet> {
        operation.validate()?;

        let result = self
            .ledger
            .update_or_create(operation.wallet_id, operation.kind, operation.amount)
            .await;

        match &result {
            Ok(wallet) => self.observer.operation_applied(operation, wallet),
            Err(WalletError::InsufficientFunds { available, .. }) => {
                self.observer.insufficient_funds(operation, *available)
            }
            Err(WalletError::WalletNotFound(_)) => {}
            Err(err) => self.observer.mutation_failed(operation, err),
        }

        result
    }

    /// Provision a wallet explicitly
    ///
    /// # Errors
    ///
    /// * `WalletError::DuplicateWallet` - A wallet with this ID already exists
    pub async fn create_wallet(&self, wallet: &Wallet) -> WalletResult<()> {
        self.ledger.create(wallet).await
    }

    /// Check that the ledger's store is reachable
    pub async fn health_check(&self) -> WalletResult<()> {
        self.ledger.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryWalletLedger;
    use crate::money::Money;
    use std::sync::Mutex;
    use tokio::task::JoinSet;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingObserver {
        applied: Mutex<Vec<WalletOperation>>,
        rejected: Mutex<Vec<(WalletOperation, Money)>>,
        failed: Mutex<Vec<String>>,
    }

    impl OperationObserver for RecordingObserver {
        fn operation_applied(&self, operation: &WalletOperation, _wallet: &Wallet) {
            self.applied.lock().unwrap().push(operation.clone());
        }

        fn insufficient_funds(&self, operation: &WalletOperation, available: Money) {
            self.rejected
                .lock()
                .unwrap()
                .push((operation.clone(), available));
        }

        fn mutation_failed(&self, _operation: &WalletOperation, error: &WalletError) {
            self.failed.lock().unwrap().push(error.to_string());
        }
    }

    fn amount(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn setup(balance: &str) -> (WalletProcessor, Arc<RecordingObserver>, WalletId) {
        let id = Uuid::new_v4();
        let ledger = MemoryWalletLedger::with_wallets([Wallet::new(id, amount(balance))]);
        let observer = Arc::new(RecordingObserver::default());
        let processor = WalletProcessor::with_observer(Arc::new(ledger), observer.clone());
        (processor, observer, id)
    }

    #[tokio::test]
    async fn test_deposit_withdraw_scenario() {
        let (processor, observer, id) = setup("1000.00");

        let wallet = processor
            .apply(&WalletOperation::deposit(id, amount("500.00")))
            .await
            .unwrap();
        assert_eq!(wallet.balance.to_string(), "1500.00");

        let wallet = processor
            .apply(&WalletOperation::withdraw(id, amount("300.00")))
            .await
            .unwrap();
        assert_eq!(wallet.balance.to_string(), "1200.00");

        let result = processor
            .apply(&WalletOperation::withdraw(id, amount("1500.00")))
            .await;
        assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));

        let wallet = processor.get_wallet(id).await.unwrap();
        assert_eq!(wallet.balance.to_string(), "1200.00");

        assert_eq!(observer.applied.lock().unwrap().len(), 2);
        let rejected = observer.rejected.lock().unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].1, amount("1200.00"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_balance() {
        let (processor, _, id) = setup("10.00");

        let result = processor
            .apply(&WalletOperation::withdraw(id, amount("15.00")))
            .await;

        assert!(matches!(result, Err(WalletError::InsufficientFunds { .. })));
        assert_eq!(processor.get_wallet(id).await.unwrap().balance, 1000);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount_before_storage() {
        let (processor, observer, _) = setup("10.00");
        let unknown = Uuid::new_v4();

        for raw in [0, -500] {
            let op = WalletOperation::deposit(unknown, Money::from_minor(raw));
            let result = processor.apply(&op).await;
            assert!(matches!(result, Err(WalletError::InvalidAmount(_))));
        }

        // Nothing was created for the unknown wallet
        assert!(matches!(
            processor.get_wallet(unknown).await,
            Err(WalletError::WalletNotFound(_))
        ));
        assert!(observer.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_withdraw_unknown_wallet_not_found() {
        let (processor, observer, _) = setup("10.00");
        let unknown = Uuid::new_v4();

        let result = processor
            .apply(&WalletOperation::withdraw(unknown, amount("1.00")))
            .await;

        assert!(matches!(result, Err(WalletError::WalletNotFound(id)) if id == unknown));
        assert!(observer.failed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deposit_unknown_wallet_creates_it() {
        let (processor, _, _) = setup("0.00");
        let fresh = Uuid::new_v4();

        let wallet = processor
            .apply(&WalletOperation::deposit(fresh, amount("5.00")))
            .await
            .unwrap();

        assert_eq!(wallet.id, fresh);
        assert_eq!(wallet.balance, 500);
    }

    #[tokio::test]
    async fn test_overflow_reported_as_mutation_failure() {
        let (processor, observer, id) = setup("0.00");
        processor
            .apply(&WalletOperation::deposit(id, Money::from_minor(i64::MAX)))
            .await
            .unwrap();

        let result = processor
            .apply(&WalletOperation::deposit(id, Money::from_minor(1)))
            .await;

        assert!(matches!(result, Err(WalletError::BalanceOverflow)));
        assert_eq!(observer.failed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_wallet_then_duplicate() {
        let (processor, _, _) = setup("0.00");
        let wallet = Wallet::new(Uuid::new_v4(), amount("25.00"));

        processor.create_wallet(&wallet).await.unwrap();
        assert_eq!(processor.get_wallet(wallet.id).await.unwrap().balance, 2500);

        assert!(matches!(
            processor.create_wallet(&wallet).await,
            Err(WalletError::DuplicateWallet(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals_stop_at_balance() {
        let (processor, observer, id) = setup("1000.00");
        let withdrawal = WalletOperation::withdraw(id, amount("150.00"));

        let mut tasks = JoinSet::new();
        for _ in 0..20 {
            let processor = processor.clone();
            let op = withdrawal.clone();
            tasks.spawn(async move { processor.apply(&op).await });
        }

        let mut succeeded = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(wallet) => {
                    assert!(!wallet.balance.is_negative());
                    succeeded += 1;
                }
                Err(WalletError::InsufficientFunds { .. }) => {}
                Err(e) => panic!("Unexpected error: {e}"),
            }
        }

        // floor(1000 / 150) withdrawals fit
        assert_eq!(succeeded, 6);
        assert_eq!(observer.rejected.lock().unwrap().len(), 14);
        assert_eq!(processor.get_wallet(id).await.unwrap().balance, 10_000);
    }
}
