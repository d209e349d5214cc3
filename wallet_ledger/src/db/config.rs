//! Database configuration module.
//!
//! Provides configuration structures for database connection management.

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,
}

impl DatabaseConfig {
    /// Build a connection URL from its parts.
    ///
    /// TLS is disabled, matching a database reached over a private network.
    pub fn connection_url(host: &str, port: &str, user: &str, password: &str, db_name: &str) -> String {
        format!("postgres://{user}:{password}@{host}:{port}/{db_name}?sslmode=disable")
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/wallets` as the database URL
    ///
    /// # Returns
    ///
    /// * `DatabaseConfig` - Default development configuration
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/wallets".to_string(),
            max_connections: 100,
            min_connections: 50,
            connection_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 300,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}
