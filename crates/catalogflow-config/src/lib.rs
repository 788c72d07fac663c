//! # CatalogFlow Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Credential signing secret, algorithm and token lifetimes
//! - [`database`]: PostgreSQL connection and store timeout settings
//! - [`server`]: Listen address, project name and log directory
//!
//! Every loader has a `from_lookup` twin that takes a key lookup function, so
//! tests can supply settings without touching the process environment.
//! Loading fails with a [`ConfigError`] instead of falling back to unsafe
//! defaults; callers treat that as fatal.
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_config::{DatabaseConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let db_config = DatabaseConfig::from_env()?;
//! ```

pub mod database;
pub mod error;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

pub(crate) fn first_of<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter().find_map(|key| lookup(key))
}

/// Reads an integer setting, falling back to `default` when unset.
pub(crate) fn parse_positive<F>(
    lookup: &F,
    var: &'static str,
    default: i64,
) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(var) {
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: "expected an integer",
        })?,
        None => default,
    };

    if value <= 0 {
        return Err(ConfigError::NonPositive { var, value });
    }

    Ok(value)
}
