//! HTTP server and process-level settings.
//!
//! # Environment Variables
//!
//! - `PROJECT_NAME`: service display name (default: `CatalogFlow`)
//! - `PROJECT_VERSION`: version reported in the API document (default: crate version)
//! - `SERVER_ADDR`: listen address (default: `0.0.0.0:8000`)
//! - `LOG_DIR`: directory for rotated JSON log files (default: `logs`)

use std::net::SocketAddr;

use crate::env_lookup;
use crate::error::ConfigError;

const DEFAULT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub project_name: String,
    pub version: String,
    pub addr: SocketAddr,
    pub log_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8000".into());
        let addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            var: "SERVER_ADDR",
            value: raw_addr.clone(),
            reason: "expected host:port",
        })?;

        Ok(Self {
            project_name: lookup("PROJECT_NAME").unwrap_or_else(|| "CatalogFlow".into()),
            version: lookup("PROJECT_VERSION").unwrap_or_else(|| DEFAULT_VERSION.into()),
            addr,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".into()),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            project_name: "CatalogFlow".into(),
            version: DEFAULT_VERSION.into(),
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            log_dir: "logs".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.project_name, "CatalogFlow");
        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(config.version, ServerConfig::default().version);
    }

    #[test]
    fn test_project_version_override() {
        let config =
            ServerConfig::from_lookup(|k| (k == "PROJECT_VERSION").then(|| "2.4.1".into()))
                .unwrap();
        assert_eq!(config.version, "2.4.1");
    }

    #[test]
    fn test_invalid_addr() {
        let err = ServerConfig::from_lookup(|k| (k == "SERVER_ADDR").then(|| "nowhere".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "SERVER_ADDR", .. }));
    }
}
