use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use catalogflow_core::AppError;
use catalogflow_models::{GlobalRole, User, UserId};
use tracing::debug;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// Extractor that verifies the bearer access token and loads the active user
/// it names.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn id(&self) -> UserId {
        self.0.id
    }

    pub fn global_role(&self) -> GlobalRole {
        self.0.global_role
    }
}

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            debug!("Missing or malformed authorization header");
            AppError::unauthenticated()
        })?;

        let user = AuthService::current_user(state.users.as_ref(), token, &state.jwt_config).await?;

        Ok(AuthUser(user))
    }
}

/// Declares an extractor that admits only callers holding one of the listed
/// global roles.
#[macro_export]
macro_rules! require_global_role {
    ($name:ident, [$($role:ident),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = catalogflow_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                let allowed = [$(catalogflow_models::GlobalRole::$role),+];
                if !allowed.contains(&auth_user.global_role()) {
                    return Err(catalogflow_core::AppError::forbidden(format!(
                        "Access denied. Role {} may not perform this action",
                        auth_user.global_role().as_str()
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_global_role!(RequirePlatformAdmin, [Superadmin, Admin]);
require_global_role!(RequireTeamCreator, [Superadmin, Admin, TeamLeader]);
