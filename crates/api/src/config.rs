use std::time::Duration;

use ladder_core::leaderboard::{DEFAULT_CACHE_TTL, DEFAULT_SWEEP_INTERVAL};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Lifetime of a cached leaderboard page in seconds (default: `300`).
    pub cache_ttl_secs: u64,
    /// Interval between expired-entry sweeps in seconds (default: `600`).
    pub cache_sweep_interval_secs: u64,
    /// Fake accounts to generate into an empty database (default: `0`).
    pub seed_demo_accounts: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `8080`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `CACHE_TTL_SECS`            | `300`                   |
    /// | `CACHE_SWEEP_INTERVAL_SECS` | `600`                   |
    /// | `SEED_DEMO_ACCOUNTS`        | `0`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let cache_ttl_secs: u64 = std::env::var("CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_CACHE_TTL.as_secs().to_string())
            .parse()
            .expect("CACHE_TTL_SECS must be a valid u64");

        let cache_sweep_interval_secs: u64 = std::env::var("CACHE_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL.as_secs().to_string())
            .parse()
            .expect("CACHE_SWEEP_INTERVAL_SECS must be a valid u64");

        let seed_demo_accounts: usize = std::env::var("SEED_DEMO_ACCOUNTS")
            .unwrap_or_else(|_| "0".into())
            .parse()
            .expect("SEED_DEMO_ACCOUNTS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            cache_ttl_secs,
            cache_sweep_interval_secs,
            seed_demo_accounts,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval_secs)
    }
}
