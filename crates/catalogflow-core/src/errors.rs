//! Application error type with HTTP response conversion.
//!
//! Every fallible operation that reaches the HTTP boundary returns an
//! [`AppError`]. Layer-specific errors (store, codec, config) are converted
//! into one of the coarse categories below before they get here, so the
//! response body never carries store-level or cryptographic detail.

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Message returned for every rejected bearer or refresh token.
pub const UNAUTHENTICATED: &str = "Could not validate credentials";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    /// Login failure. Unknown email, inactive account and wrong password all
    /// produce this exact error.
    pub fn invalid_credentials() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(INVALID_CREDENTIALS))
    }

    /// Token failure. Bad signature, expiry, malformed subject and wrong
    /// token kind all produce this exact error.
    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(UNAUTHENTICATED))
    }

    /// The backing store did not answer in time.
    pub fn timeout<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self.status {
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!(error = ?self.error, "store unavailable");
                "Service temporarily unavailable".to_string()
            }
            status if status.is_server_error() => {
                tracing::error!(error = ?self.error, "internal error");
                "Internal server error".to_string()
            }
            _ => self.error.to_string(),
        };

        let mut response = (self.status, Json(json!({ "error": message }))).into_response();

        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::internal(anyhow!("background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value, Response) {
        let response = err.into_response();
        let status = response.status();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value, Response::from_parts(parts, axum::body::Body::empty()))
    }

    #[tokio::test]
    async fn test_invalid_credentials_response() {
        let (status, body, response) = body_json(AppError::invalid_credentials()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], INVALID_CREDENTIALS);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let err = AppError::internal(anyhow!("relation auth.users does not exist"));
        let (status, body, _) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_service_unavailable() {
        let (status, body, _) = body_json(AppError::timeout(anyhow!("pool timed out"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Service temporarily unavailable");
    }

    #[tokio::test]
    async fn test_client_errors_keep_message() {
        let (status, body, _) = body_json(AppError::conflict(anyhow!("Email already exists"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");
    }

    #[test]
    fn test_from_anyhow_is_internal() {
        let err: AppError = anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
