//! Credential issuer: builds access and renewal tokens for a verified user.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use catalogflow_config::JwtConfig;
use catalogflow_core::AppError;

use crate::claims::TokenKind;
use crate::jwt::encode_token;

/// An access token and a renewal token for the same subject.
///
/// The two expire independently; the renewal token always outlives the
/// access token when the configured lifetimes say so.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

fn expiry(issued_at: DateTime<Utc>, lifetime_secs: i64) -> Result<DateTime<Utc>, AppError> {
    TimeDelta::try_seconds(lifetime_secs)
        .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::internal_error("Token expiry out of range"))
}

pub fn issue_token_pair(user_id: Uuid, jwt_config: &JwtConfig) -> Result<TokenPair, AppError> {
    issue_token_pair_at(user_id, Utc::now(), jwt_config)
}

pub fn issue_token_pair_at(
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    let access_expires_at = expiry(issued_at, jwt_config.access_token_expiry())?;
    let refresh_expires_at = expiry(issued_at, jwt_config.refresh_token_expiry())?;

    Ok(TokenPair {
        access_token: encode_token(user_id, TokenKind::Access, access_expires_at, jwt_config)?,
        refresh_token: encode_token(user_id, TokenKind::Renewal, refresh_expires_at, jwt_config)?,
        access_expires_at,
        refresh_expires_at,
    })
}

/// Issues only an access token. Used when renewing.
pub fn issue_access_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, AppError> {
    issue_access_token_at(user_id, Utc::now(), jwt_config)
}

pub fn issue_access_token_at(
    user_id: Uuid,
    issued_at: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let expires_at = expiry(issued_at, jwt_config.access_token_expiry())?;
    encode_token(user_id, TokenKind::Access, expires_at, jwt_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::decode_token_at;
    use axum::http::StatusCode;
    use chrono::Duration;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig::new("test-secret-key-at-least-32-characters-long", "HS256", 60, 7).unwrap()
    }

    #[test]
    fn test_pair_has_independent_expirations() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let pair = issue_token_pair_at(user_id, now, &config).unwrap();

        assert_eq!(pair.access_expires_at, now + Duration::minutes(60));
        assert_eq!(pair.refresh_expires_at, now + Duration::days(7));
        assert_ne!(pair.access_token, pair.refresh_token);

        let access = decode_token_at(&pair.access_token, now, &config).unwrap();
        let renewal = decode_token_at(&pair.refresh_token, now, &config).unwrap();
        assert_eq!(access.subject, user_id);
        assert_eq!(renewal.subject, user_id);
        assert_eq!(access.kind, TokenKind::Access);
        assert_eq!(renewal.kind, TokenKind::Renewal);
    }

    #[test]
    fn test_access_token_expires_before_renewal_token() {
        let config = get_test_jwt_config();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let pair = issue_token_pair_at(Uuid::new_v4(), now, &config).unwrap();

        let later = now + Duration::minutes(61);
        assert!(decode_token_at(&pair.access_token, later, &config).is_err());
        assert!(decode_token_at(&pair.refresh_token, later, &config).is_ok());
    }

    #[test]
    fn test_issue_access_token() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        let token = issue_access_token_at(user_id, now, &config).unwrap();
        let decoded = decode_token_at(&token, now, &config).unwrap();
        assert_eq!(decoded.kind, TokenKind::Access);
        assert_eq!(decoded.expires_at, now + Duration::hours(1));
        assert!(issue_access_token(user_id, &config).is_ok());
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error_not_a_panic() {
        let config = get_test_jwt_config();
        let end_of_time = DateTime::<Utc>::MAX_UTC;

        let err = issue_token_pair_at(Uuid::new_v4(), end_of_time, &config).unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = issue_access_token_at(Uuid::new_v4(), end_of_time, &config).unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
