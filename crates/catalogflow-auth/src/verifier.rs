//! Credential verifier: the single gate in front of protected resources and
//! token renewal.
//!
//! Every failure, whatever its cause, becomes [`AppError::unauthenticated`].
//! The cause is only visible at debug level.

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use catalogflow_config::JwtConfig;
use catalogflow_core::AppError;

use crate::claims::TokenKind;
use crate::jwt::decode_token_at;

/// Verifies `token` and checks it is of `expected_kind`, returning the
/// subject's user id.
pub fn verify_token(
    token: &str,
    expected_kind: TokenKind,
    jwt_config: &JwtConfig,
) -> Result<Uuid, AppError> {
    verify_token_at(token, expected_kind, Utc::now(), jwt_config)
}

pub fn verify_token_at(
    token: &str,
    expected_kind: TokenKind,
    now: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<Uuid, AppError> {
    let decoded = decode_token_at(token, now, jwt_config).map_err(|e| {
        debug!(reason = %e, expected = %expected_kind, "Token rejected");
        AppError::unauthenticated()
    })?;

    if decoded.kind != expected_kind {
        debug!(
            presented = %decoded.kind,
            expected = %expected_kind,
            "Token rejected: wrong kind"
        );
        return Err(AppError::unauthenticated());
    }

    Ok(decoded.subject)
}
