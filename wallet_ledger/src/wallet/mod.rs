//! Wallet module providing balance queries, deposits and withdrawals.
//!
//! This module implements:
//! - Wallet and operation models
//! - The operation processor that validates and applies deposits/withdrawals
//! - Injected observers for insufficient-funds and failure notices
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use wallet_ledger::db::{Database, PgWalletLedger};
//! use wallet_ledger::money::Money;
//! use wallet_ledger::wallet::{WalletOperation, WalletProcessor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     let processor = WalletProcessor::new(Arc::new(PgWalletLedger::new(db.pool().clone())));
//!
//!     let wallet_id = uuid::Uuid::new_v4();
//!     let amount: Money = "500.00".parse()?;
//!     let wallet = processor
//!         .apply(&WalletOperation::deposit(wallet_id, amount))
//!         .await?;
//!     println!("New balance: {}", wallet.balance);
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod observer;
pub mod processor;

pub use errors::{WalletError, WalletResult};
pub use models::{OperationKind, Wallet, WalletId, WalletOperation};
pub use observer::{LogObserver, OperationObserver};
pub use processor::WalletProcessor;
