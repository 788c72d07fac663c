//! Credential codec: signs and reads `{sub, type, exp}` tokens.
//!
//! Tokens are HMAC-signed JWTs using the process-wide secret and algorithm
//! from [`JwtConfig`]. Encoding is deterministic: the claim set carries no
//! issue time or nonce, so identical inputs produce identical tokens.
//!
//! Expiry is checked here rather than by `jsonwebtoken`, against an explicit
//! `now`, with no leeway: a token is expired from the second `exp` names.
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_auth::{TokenKind, decode_token, encode_token};
//!
//! let token = encode_token(user_id, TokenKind::Access, expires_at, &config)?;
//! let decoded = decode_token(&token, &config)?;
//! assert_eq!(decoded.subject, user_id);
//! ```

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use catalogflow_config::JwtConfig;
use catalogflow_core::AppError;

use crate::claims::{Claims, TokenKind};

/// Why a token could not be decoded.
///
/// Callers outside this crate only ever see these collapsed into a single
/// unauthenticated error; the variants exist for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("token signature or structure is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token subject is not a valid identity")]
    Malformed,
}

/// A token whose signature and expiry have been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedToken {
    pub subject: Uuid,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

pub fn encode_token(
    subject: Uuid,
    kind: TokenKind,
    expires_at: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let claims = Claims {
        sub: subject.to_string(),
        kind,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(jwt_config.algorithm()),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create {} token: {}", kind, e)))
}

/// Decodes `token`, checking expiry against the current time.
pub fn decode_token(token: &str, jwt_config: &JwtConfig) -> Result<DecodedToken, CodecError> {
    decode_token_at(token, Utc::now(), jwt_config)
}

/// Decodes `token`, checking expiry against `now`.
pub fn decode_token_at(
    token: &str,
    now: DateTime<Utc>,
    jwt_config: &JwtConfig,
) -> Result<DecodedToken, CodecError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret()),
        &validation(jwt_config),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => CodecError::Expired,
        _ => CodecError::InvalidSignature,
    })?;

    let claims = data.claims;

    if now.timestamp() >= claims.exp {
        return Err(CodecError::Expired);
    }

    let subject = Uuid::parse_str(&claims.sub).map_err(|_| CodecError::Malformed)?;
    let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(CodecError::Malformed)?;

    Ok(DecodedToken {
        subject,
        kind: claims.kind,
        expires_at,
    })
}

fn validation(jwt_config: &JwtConfig) -> Validation {
    let mut validation = Validation::new(jwt_config.algorithm());
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}
