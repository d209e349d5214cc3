//! In-memory `WalletLedger` for tests and local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::repository::WalletLedger;
use crate::money::Money;
use crate::wallet::errors::{WalletError, WalletResult};
use crate::wallet::models::{OperationKind, Wallet, WalletId};

/// Ledger backed by a shared map. Every call holds the lock for its whole
/// read-modify-write, which gives the same atomicity as a single statement.
#[derive(Clone, Default)]
pub struct MemoryWalletLedger {
    wallets: Arc<Mutex<HashMap<WalletId, Wallet>>>,
}

impl MemoryWalletLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-populated with `wallets`.
    pub fn with_wallets(wallets: impl IntoIterator<Item = Wallet>) -> Self {
        let wallets = wallets.into_iter().map(|w| (w.id, w)).collect();
        Self {
            wallets: Arc::new(Mutex::new(wallets)),
        }
    }

    /// Number of stored wallets.
    pub async fn len(&self) -> usize {
        self.wallets.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wallets.lock().await.is_empty()
    }
}

#[async_trait]
impl WalletLedger for MemoryWalletLedger {
    async fn fetch(&self, wallet_id: WalletId) -> WalletResult<Wallet> {
        self.wallets
            .lock()
            .await
            .get(&wallet_id)
            .cloned()
            .ok_or(WalletError::WalletNotFound(wallet_id))
    }

    async fn update_or_create(
        &self,
        wallet_id: WalletId,
        kind: OperationKind,
        amount: Money,
    ) -> WalletResult<Wallet> {
        let mut wallets = self.wallets.lock().await;
        let now = Utc::now();

        let Some(wallet) = wallets.get_mut(&wallet_id) else {
            return match kind {
                OperationKind::Deposit => {
                    let wallet = Wallet {
                        id: wallet_id,
                        balance: amount,
                        created_at: now,
                        updated_at: Some(now),
                    };
                    wallets.insert(wallet_id, wallet.clone());
                    Ok(wallet)
                }
                OperationKind::Withdraw => Err(WalletError::WalletNotFound(wallet_id)),
            };
        };

        wallet.balance = match kind {
            OperationKind::Deposit => wallet.balance.add(amount)?,
            OperationKind::Withdraw if wallet.balance < amount => {
                return Err(WalletError::InsufficientFunds {
                    wallet_id,
                    available: wallet.balance,
                    required: amount,
                });
            }
            OperationKind::Withdraw => wallet.balance.sub(amount)?,
        };
        wallet.updated_at = Some(now);

        Ok(wallet.clone())
    }

    async fn create(&self, wallet: &Wallet) -> WalletResult<()> {
        let mut wallets = self.wallets.lock().await;
        if wallets.contains_key(&wallet.id) {
            return Err(WalletError::DuplicateWallet(wallet.id));
        }
        wallets.insert(wallet.id, wallet.clone());
        Ok(())
    }

    async fn health_check(&self) -> WalletResult<()> {
        Ok(())
    }
}
