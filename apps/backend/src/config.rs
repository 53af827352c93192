//! Server configuration from environment variables.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Interface to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Tracing filter directive.
    pub log_filter: String,
    /// Upper bound for the connection pool.
    pub max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `HOST` (default `0.0.0.0`)
    /// - `PORT` (default `3000`)
    /// - `RUST_LOG` (default `info`)
    /// - `DATABASE_MAX_CONNECTIONS` (default `10`)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or("PORT", lookup("PORT"), 3000)?;
        let log_filter = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());
        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            10,
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            log_filter,
            max_connections,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("cannot parse '{}'", raw),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}
