//! Database connection configuration.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string. When absent it is composed
//!   from `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST` (default
//!   `localhost`), `POSTGRES_PORT` (default `5432`) and `POSTGRES_DB`.
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `STORE_TIMEOUT_MS`: upper bound for a single store call (default: 5000)

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::{env_lookup, parse_positive};

pub const DEFAULT_MAX_CONNECTIONS: i64 = 10;
pub const DEFAULT_STORE_TIMEOUT_MS: i64 = 5_000;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub store_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url,
            None => compose_url(&lookup)?,
        };

        let max_connections =
            parse_positive(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let max_connections =
            u32::try_from(max_connections).map_err(|_| ConfigError::Invalid {
                var: "DATABASE_MAX_CONNECTIONS",
                value: max_connections.to_string(),
                reason: "too large",
            })?;

        let timeout_ms = parse_positive(&lookup, "STORE_TIMEOUT_MS", DEFAULT_STORE_TIMEOUT_MS)?;

        Ok(Self {
            url,
            max_connections,
            store_timeout: Duration::from_millis(timeout_ms as u64),
        })
    }
}

fn compose_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let user = lookup("POSTGRES_USER").ok_or(ConfigError::Missing("DATABASE_URL"))?;
    let password = lookup("POSTGRES_PASSWORD").ok_or(ConfigError::Missing("POSTGRES_PASSWORD"))?;
    let db = lookup("POSTGRES_DB").ok_or(ConfigError::Missing("POSTGRES_DB"))?;
    let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".into());
    let port = lookup("POSTGRES_PORT").unwrap_or_else(|| "5432".into());

    port.parse::<u16>().map_err(|_| ConfigError::Invalid {
        var: "POSTGRES_PORT",
        value: port.clone(),
        reason: "expected a port number",
    })?;

    Ok(format!("postgres://{user}:{password}@{host}:{port}/{db}"))
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The URL usually embeds a password.
        let redacted = match self.url.rsplit_once('@') {
            Some((_, host)) => format!("postgres://<redacted>@{host}"),
            None => self.url.clone(),
        };
        f.debug_struct("DatabaseConfig")
            .field("url", &redacted)
            .field("max_connections", &self.max_connections)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}
