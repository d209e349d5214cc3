//! # Wallet Ledger
//!
//! Wallet balances with atomic deposits and withdrawals.
//!
//! Balances are kept as fixed-point minor units ([`money::Money`]) so that
//! repeated arithmetic never drifts. Every mutation goes through a
//! [`db::WalletLedger`], which applies it in a single atomic step:
//!
//! - A deposit to an unknown wallet creates it.
//! - A withdrawal from an unknown wallet fails with `WalletNotFound`.
//! - A withdrawal larger than the balance fails with `InsufficientFunds`,
//!   checked inside the same conditional update that debits the balance.
//!
//! ## Core Modules
//!
//! - [`money`]: Fixed-point amounts, parsing and formatting
//! - [`wallet`]: Models, errors and the operation processor
//! - [`db`]: Connection pool, ledger trait and its PostgreSQL and in-memory implementations
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wallet_ledger::db::MemoryWalletLedger;
//! use wallet_ledger::wallet::{WalletOperation, WalletProcessor};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let processor = WalletProcessor::new(Arc::new(MemoryWalletLedger::new()));
//! let wallet_id = uuid::Uuid::new_v4();
//!
//! let wallet = processor
//!     .apply(&WalletOperation::deposit(wallet_id, "12.50".parse().unwrap()))
//!     .await
//!     .unwrap();
//! assert_eq!(wallet.balance.to_string(), "12.50");
//! # }
//! ```

/// Database pool, ledger trait and implementations.
pub mod db;

/// Fixed-point money.
pub mod money;

/// Wallet models, errors and processing.
pub mod wallet;

pub use money::Money;
pub use wallet::{OperationKind, Wallet, WalletError, WalletOperation, WalletProcessor, WalletResult};
