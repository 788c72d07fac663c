//! Authentication request and response DTOs.
//!
//! Login accepts an OAuth2 password-grant style form; the `username` field
//! carries the account email.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Token type reported in every token response.
pub const BEARER: &str = "bearer";

/// Login form (`application/x-www-form-urlencoded`).
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
    /// Account email.
    #[validate(length(min = 1))]
    #[schema(example = "ada@example.com")]
    pub username: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Access and renewal tokens returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Fresh access token issued from a renewal token. No new renewal token is
/// issued.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

impl AccessTokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: BEARER.to_string(),
        }
    }
}

/// Plain status message body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_shape() {
        let response = TokenResponse::bearer("a".into(), "r".into());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
        assert_eq!(json["token_type"], "bearer");
    }

    #[test]
    fn test_refresh_request_requires_token() {
        let empty = RefreshTokenRequest {
            refresh_token: String::new(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_login_form_validation() {
        let form = LoginForm {
            username: "ada@example.com".into(),
            password: String::new(),
        };
        assert!(form.validate().is_err());
    }
}
