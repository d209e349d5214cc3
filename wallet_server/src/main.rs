//! Wallet HTTP server.
//!
//! Loads configuration, connects to PostgreSQL, bootstraps the schema and
//! serves the wallet API until Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use wallet_ledger::{WalletProcessor, db::Database};
use wallet_server::{
    api,
    config::ServerConfig,
    logging,
    metrics::{self, MetricsObserver},
};

const HELP: &str = "\
Run the wallet balance server

USAGE:
  wallet_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 0.0.0.0:$HTTP_PORT]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or built from DB_*]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  APP_ENV                  Deployment environment [default: local]
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  HTTP_PORT                Port used when SERVER_BIND is unset [default: 8080]
  DATABASE_URL             PostgreSQL connection string
  DB_HOST, DB_PORT, DB_USERNAME, DB_PASSWORD, DB_NAME
                           Connection parts used when DATABASE_URL is unset
  MAX_CONNECTIONS          Pool size [default: 100]
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  RUST_LOG                 Log filter [default: info,sqlx=warn,hyper=warn]
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind: Option<SocketAddr> = pargs
        .opt_value_from_str("--bind")
        .context("Invalid --bind address")?;
    let database_url: Option<String> = pargs
        .opt_value_from_str("--db-url")
        .context("Invalid --db-url value")?;

    let config = ServerConfig::from_env(bind, database_url)?;
    config.validate()?;

    logging::init(config.is_local());
    tracing::info!(app_env = %config.app_env, bind = %config.bind, "Starting wallet server");

    if let Some(metrics_bind) = config.metrics_bind {
        metrics::init_metrics(metrics_bind).map_err(anyhow::Error::msg)?;
        tracing::info!("Prometheus metrics exposed at http://{}/metrics", metrics_bind);
    }

    let db = Database::new(&config.database)
        .await
        .context("Failed to connect to database")?;
    db.health_check()
        .await
        .context("Database health check failed")?;
    db.ensure_schema()
        .await
        .context("Failed to create wallet schema")?;
    tracing::info!("Database connected successfully");

    let processor =
        WalletProcessor::with_observer(Arc::new(db.ledger()), Arc::new(MetricsObserver::default()));
    let app = api::create_router(api::AppState::new(processor));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down server...");
    db.close().await;

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
