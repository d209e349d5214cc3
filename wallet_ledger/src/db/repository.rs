//! Ledger trait and its PostgreSQL implementation.
//!
//! The [`WalletLedger`] trait is the storage boundary for wallet balances. It
//! lets the processor run against PostgreSQL in production and against
//! [`MemoryWalletLedger`](super::memory::MemoryWalletLedger) in tests.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::timeouts::with_default_timeout;
use crate::money::Money;
use crate::wallet::errors::{WalletError, WalletResult, map_insert_error};
use crate::wallet::models::{OperationKind, Wallet, WalletId};

/// Sole owner of persisted wallet rows.
#[async_trait]
pub trait WalletLedger: Send + Sync {
    /// Get wallet by ID
    async fn fetch(&self, wallet_id: WalletId) -> WalletResult<Wallet>;

    /// Apply a deposit or withdrawal atomically and return the updated wallet.
    ///
    /// A deposit to an unknown wallet creates it with `amount` as its balance.
    /// A withdrawal from an unknown wallet fails with
    /// `WalletError::WalletNotFound` and creates nothing. A withdrawal larger
    /// than the balance fails with `WalletError::InsufficientFunds` and leaves
    /// the balance untouched; the check and the decrement are one atomic step.
    async fn update_or_create(
        &self,
        wallet_id: WalletId,
        kind: OperationKind,
        amount: Money,
    ) -> WalletResult<Wallet>;

    /// Insert a wallet unconditionally
    async fn create(&self, wallet: &Wallet) -> WalletResult<()>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> WalletResult<()>;
}

/// Default PostgreSQL implementation of `WalletLedger`
#[derive(Clone)]
pub struct PgWalletLedger {
    pool: PgPool,
}

impl PgWalletLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn wallet_from_row(row: &PgRow) -> WalletResult<Wallet> {
    Ok(Wallet {
        id: row.try_get("id")?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl WalletLedger for PgWalletLedger {
    async fn fetch(&self, wallet_id: WalletId) -> WalletResult<Wallet> {
        let row = with_default_timeout(
            sqlx::query(
                "SELECT id, balance, created_at, updated_at
                 FROM wallets
                 WHERE id = $1",
            )
            .bind(wallet_id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or(WalletError::WalletNotFound(wallet_id))?;

        wallet_from_row(&row)
    }

    async fn update_or_create(
        &self,
        wallet_id: WalletId,
        kind: OperationKind,
        amount: Money,
    ) -> WalletResult<Wallet> {
        let mut tx = with_default_timeout(self.pool.begin()).await?;

        let wallet = match kind {
            OperationKind::Deposit => {
                // Credit the row, or create it when this is the first deposit
                let row = with_default_timeout(
                    sqlx::query(
                        "INSERT INTO wallets (id, balance, created_at, updated_at)
                         VALUES ($1, $2, NOW(), NOW())
                         ON CONFLICT (id)
                         DO UPDATE SET
                            balance = wallets.balance + EXCLUDED.balance,
                            updated_at = NOW()
                         RETURNING id, balance, created_at, updated_at",
                    )
                    .bind(wallet_id)
                    .bind(amount)
                    .fetch_one(&mut *tx),
                )
                .await?;

                wallet_from_row(&row)?
            }
            OperationKind::Withdraw => {
                // Balance check and debit in one statement so concurrent
                // withdrawals cannot both pass against a stale balance
                let row = with_default_timeout(
                    sqlx::query(
                        "UPDATE wallets
                         SET balance = balance - $2, updated_at = NOW()
                         WHERE id = $1 AND balance >= $2
                         RETURNING id, balance, created_at, updated_at",
                    )
                    .bind(wallet_id)
                    .bind(amount)
                    .fetch_optional(&mut *tx),
                )
                .await?;

                match row {
                    Some(row) => wallet_from_row(&row)?,
                    None => {
                        // Either wallet doesn't exist or insufficient balance.
                        // The row lock pins the reported balance until rollback.
                        let existing = with_default_timeout(
                            sqlx::query("SELECT balance FROM wallets WHERE id = $1 FOR SHARE")
                                .bind(wallet_id)
                                .fetch_optional(&mut *tx),
                        )
                        .await?;

                        return Err(match existing {
                            Some(row) => WalletError::InsufficientFunds {
                                wallet_id,
                                available: row.try_get("balance")?,
                                required: amount,
                            },
                            None => WalletError::WalletNotFound(wallet_id),
                        });
                    }
                }
            }
        };

        with_default_timeout(tx.commit()).await?;

        Ok(wallet)
    }

    async fn create(&self, wallet: &Wallet) -> WalletResult<()> {
        with_default_timeout(
            sqlx::query(
                "INSERT INTO wallets (id, balance, created_at, updated_at)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(wallet.id)
            .bind(wallet.balance)
            .bind(wallet.created_at)
            .bind(wallet.updated_at)
            .execute(&self.pool),
        )
        .await
        .map_err(|e| map_insert_error(wallet.id, e.into()))?;

        Ok(())
    }

    async fn health_check(&self) -> WalletResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}
