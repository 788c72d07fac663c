//! Login, token renewal and current-user resolution.
//!
//! Login moves through identity resolution, secret verification and token
//! issuance. Every failure on that path is reported as the same
//! [`AppError::invalid_credentials`], and an unknown or inactive account
//! still costs one bcrypt verification.

use anyhow::anyhow;
use catalogflow_auth::{TokenKind, issue_access_token, issue_token_pair, verify_token};
use catalogflow_config::JwtConfig;
use catalogflow_core::AppError;
use catalogflow_db::{UserCredentials, UserRepository};
use catalogflow_models::{
    AccessTokenResponse, LoginForm, RefreshTokenRequest, TokenResponse, User, UserId,
};
use tracing::{error, info, instrument, warn};

use crate::modules::users::service::UserService;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, form, jwt_config), fields(email = %form.username))]
    pub async fn login(
        users: &dyn UserRepository,
        form: LoginForm,
        jwt_config: &JwtConfig,
    ) -> Result<TokenResponse, AppError> {
        let credentials = UserService::find_credentials(users, &form.username).await?;

        let verified = match credentials {
            Some(UserCredentials {
                user,
                password_hash,
            }) if user.is_active => {
                match UserService::verify_secret(password_hash, form.password).await {
                    Ok(matched) => matched.then_some(user),
                    Err(e) => {
                        error!(
                            error = %e.error,
                            user_id = %user.id,
                            "Stored password hash unusable"
                        );
                        None
                    }
                }
            }
            _ => {
                UserService::verify_absent_secret(form.password).await?;
                None
            }
        };

        let Some(user) = verified else {
            warn!("Login failed");
            return Err(AppError::invalid_credentials());
        };

        let pair = issue_token_pair(user.id.into_inner(), jwt_config)?;

        info!(user_id = %user.id, "User logged in");
        Ok(TokenResponse::bearer(pair.access_token, pair.refresh_token))
    }

    /// Exchanges a renewal token for a fresh access token. The renewal token
    /// itself is not rotated.
    #[instrument(skip(users, dto, jwt_config))]
    pub async fn refresh(
        users: &dyn UserRepository,
        dto: RefreshTokenRequest,
        jwt_config: &JwtConfig,
    ) -> Result<AccessTokenResponse, AppError> {
        let user_id = UserId::from(verify_token(
            &dto.refresh_token,
            TokenKind::Renewal,
            jwt_config,
        )?);

        let user = UserService::find_by_id(users, user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        let access_token = issue_access_token(user.id.into_inner(), jwt_config)?;

        info!(user_id = %user.id, "Access token renewed");
        Ok(AccessTokenResponse::bearer(access_token))
    }

    /// Resolves the active user named by an access token.
    pub async fn current_user(
        users: &dyn UserRepository,
        access_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<User, AppError> {
        let user_id = UserId::from(verify_token(access_token, TokenKind::Access, jwt_config)?);

        match UserService::find_by_id(users, user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                tracing::debug!(%user_id, "Token subject missing or inactive");
                Err(AppError::unauthenticated())
            }
        }
    }
}
