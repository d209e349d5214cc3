//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use wallet_ledger::db::DatabaseConfig;

/// Environment name used when `APP_ENV` is not set
pub const ENV_LOCAL: &str = "local";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment (`APP_ENV`)
    pub app_env: String,
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Optional Prometheus exporter address
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            database_url_override,
        )
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| ENV_LOCAL.to_string());

        // Bind address: CLI, then SERVER_BIND, then all interfaces on HTTP_PORT
        let bind = match bind_override {
            Some(addr) => addr,
            None => match lookup("SERVER_BIND") {
                Some(value) => parse_addr("SERVER_BIND", &value)?,
                None => {
                    let port = lookup("HTTP_PORT").unwrap_or_else(|| "8080".to_string());
                    parse_addr("HTTP_PORT", &format!("0.0.0.0:{port}"))?
                }
            },
        };

        // Database URL: CLI, then DATABASE_URL, then the DB_* parts (all required)
        let database_url = match database_url_override.or_else(|| lookup("DATABASE_URL")) {
            Some(url) => url,
            None => {
                let require = |var: &str| {
                    lookup(var).ok_or_else(|| ConfigError::MissingRequired {
                        var: var.to_string(),
                        hint: "Set DATABASE_URL or all of DB_HOST, DB_PORT, DB_USERNAME, DB_PASSWORD, DB_NAME".to_string(),
                    })
                };
                DatabaseConfig::connection_url(
                    &require("DB_HOST")?,
                    &require("DB_PORT")?,
                    &require("DB_USERNAME")?,
                    &require("DB_PASSWORD")?,
                    &require("DB_NAME")?,
                )
            }
        };

        let max_connections: u32 = parse_or(&lookup, "MAX_CONNECTIONS", 100)?;
        let database = DatabaseConfig {
            database_url,
            max_connections,
            min_connections: max_connections / 2,
            connection_timeout_secs: parse_or(&lookup, "DB_CONNECTION_TIMEOUT_SECS", 5)?,
            idle_timeout_secs: parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", 300)?,
            max_lifetime_secs: parse_or(&lookup, "DB_MAX_LIFETIME_SECS", 300)?,
        };

        let metrics_bind = lookup("METRICS_BIND")
            .map(|value| parse_addr("METRICS_BIND", &value))
            .transpose()?;

        Ok(ServerConfig {
            app_env,
            bind,
            database,
            metrics_bind,
        })
    }

    /// Whether the server runs in the local development environment
    pub fn is_local(&self) -> bool {
        self.app_env == ENV_LOCAL
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.connection_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_CONNECTION_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse a variable with default fallback; set-but-invalid is an error
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse {value:?}"),
        }),
        None => Ok(default),
    }
}

fn parse_addr(var: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        var: var.to_string(),
        reason: format!("{value:?} is not a valid socket address"),
    })
}
