//! Connection and service configuration.

use std::time::Duration;

/// Postgres connection parameters.
///
/// Shared by the Postgres store and by the test fixture so both talk to
/// the same database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Role name
    pub user: String,
    /// Role password
    pub password: String,
    /// Database name
    pub database: String,
    /// Maximum pooled connections (store only)
    pub max_connections: u32,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "app".to_string(),
            max_connections: 4,
            connect_timeout_ms: 5000,
        }
    }
}

impl PostgresConfig {
    /// Builds a `postgres::Config` from these parameters.
    pub fn to_pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database)
            .connect_timeout(Duration::from_millis(self.connect_timeout_ms));
        config
    }

    /// Connection target without the password, for logs.
    pub fn redacted(&self) -> String {
        format!(
            "postgres://{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}
