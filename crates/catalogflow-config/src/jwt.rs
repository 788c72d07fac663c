//! Credential signing configuration.
//!
//! # Environment Variables
//!
//! - `JWT_SECRET` (or `SECRET_KEY`): HMAC signing secret (required)
//! - `JWT_ALGORITHM` (or `ALGORITHM`): `HS256` (default), `HS384` or `HS512`
//! - `ACCESS_TOKEN_EXPIRE_MINUTES`: access token lifetime (default: 60)
//! - `REFRESH_TOKEN_EXPIRE_DAYS`: renewal token lifetime (default: 7)

use std::fmt;
use std::str::FromStr;

use chrono::{TimeDelta, Utc};
use jsonwebtoken::Algorithm;

use crate::error::ConfigError;
use crate::{env_lookup, first_of, parse_positive};

pub const DEFAULT_ACCESS_TOKEN_MINUTES: i64 = 60;
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Signing secret, algorithm and token lifetimes.
///
/// Read-only after startup. Lifetimes are stored in seconds and are always
/// strictly positive; the only way to build one is through [`JwtConfig::new`]
/// or the env loaders, which validate.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    algorithm: Algorithm,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn new(
        secret: impl Into<String>,
        algorithm: &str,
        access_token_minutes: i64,
        refresh_token_days: i64,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let algorithm = parse_algorithm(algorithm)?;

        if access_token_minutes <= 0 {
            return Err(ConfigError::NonPositive {
                var: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: access_token_minutes,
            });
        }
        if refresh_token_days <= 0 {
            return Err(ConfigError::NonPositive {
                var: "REFRESH_TOKEN_EXPIRE_DAYS",
                value: refresh_token_days,
            });
        }

        Ok(Self {
            secret,
            algorithm,
            access_token_expiry: lifetime_seconds(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                access_token_minutes,
                60,
            )?,
            refresh_token_expiry: lifetime_seconds(
                "REFRESH_TOKEN_EXPIRE_DAYS",
                refresh_token_days,
                24 * 60 * 60,
            )?,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = first_of(&lookup, &["JWT_SECRET", "SECRET_KEY"])
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let algorithm =
            first_of(&lookup, &["JWT_ALGORITHM", "ALGORITHM"]).unwrap_or_else(|| "HS256".into());
        let access_minutes = parse_positive(
            &lookup,
            "ACCESS_TOKEN_EXPIRE_MINUTES",
            DEFAULT_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_days =
            parse_positive(&lookup, "REFRESH_TOKEN_EXPIRE_DAYS", DEFAULT_REFRESH_TOKEN_DAYS)?;

        Self::new(secret, &algorithm, access_minutes, refresh_days)
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Access token lifetime in seconds.
    pub fn access_token_expiry(&self) -> i64 {
        self.access_token_expiry
    }

    /// Renewal token lifetime in seconds.
    pub fn refresh_token_expiry(&self) -> i64 {
        self.refresh_token_expiry
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}

/// Converts a lifetime to seconds. The result must fit in `i64` and still be
/// representable when added to the current time, or issuing would fail.
fn lifetime_seconds(var: &'static str, value: i64, unit: i64) -> Result<i64, ConfigError> {
    let too_large = || ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: "lifetime too large",
    };

    let seconds = value.checked_mul(unit).ok_or_else(too_large)?;
    TimeDelta::try_seconds(seconds)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(too_large)?;

    Ok(seconds)
}

fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(value.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::UnsupportedAlgorithm(value.to_string())),
    }
}
