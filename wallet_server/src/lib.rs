//! HTTP server for wallet deposits, withdrawals and balance lookups.
//!
//! The binary in `main.rs` wires configuration, logging and metrics around
//! the router built by [`api::create_router`].

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
