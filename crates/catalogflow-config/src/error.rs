//! Startup configuration errors.

/// A configuration problem detected while loading settings.
///
/// Every variant is fatal: the process must not start serving requests with
/// a partial configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("{var} must be a positive number, got {value}")]
    NonPositive { var: &'static str, value: i64 },

    #[error("unsupported signing algorithm {0:?}; expected one of HS256, HS384, HS512")]
    UnsupportedAlgorithm(String),
}
