use std::env;
use std::time::Duration;

/// Connection settings for the MongoDB pool.
///
/// Defaults mirror the deployment the service runs against: 10s connect,
/// 20s socket, 5s server selection, 50 pooled connections, retryable writes.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database: String,
    pub connect_timeout: Duration,
    /// Carried for parity with deployment config; the Rust driver exposes
    /// no socketTimeoutMS knob (see `MongoDB::connect`).
    pub socket_timeout: Duration,
    pub server_selection_timeout: Duration,
    pub max_pool_size: u32,
    pub retry_writes: bool,
}

impl DatabaseConfig {
    pub fn new(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Read MONGODB_URI / MONGODB_DATABASE from the environment (.env aware),
    /// falling back to local defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database =
            env::var("MONGODB_DATABASE").unwrap_or_else(|_| "medtrack_db".to_string());

        Self::new(uri, database)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "medtrack_db".to_string(),
            connect_timeout: Duration::from_secs(10),
            socket_timeout: Duration::from_secs(20),
            server_selection_timeout: Duration::from_secs(5),
            max_pool_size: 50,
            retry_writes: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_tunables() {
        let config = DatabaseConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.socket_timeout, Duration::from_secs(20));
        assert_eq!(config.server_selection_timeout, Duration::from_secs(5));
        assert_eq!(config.max_pool_size, 50);
        assert!(config.retry_writes);
    }

    #[test]
    fn new_keeps_tunable_defaults() {
        let config = DatabaseConfig::new("mongodb://db:27017", "medtrack_test");
        assert_eq!(config.uri, "mongodb://db:27017");
        assert_eq!(config.database, "medtrack_test");
        assert_eq!(config.max_pool_size, 50);
    }
}
