use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use catalogflow_core::AppError;
use catalogflow_models::{CreateUserDto, UpdateUserDto, User, UserId};
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequirePlatformAdmin};
use crate::middleware::role::{ensure_can_grant, ensure_can_manage_user};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller may not grant the requested role", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, actor, dto), fields(actor_id = %actor.id()))]
pub async fn create_user(
    State(state): State<AppState>,
    RequirePlatformAdmin(actor): RequirePlatformAdmin,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    ensure_can_grant(&actor, dto.global_role)?;
    let user = UserService::create_user(state.users.as_ref(), dto, Some(actor.id())).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = UserId, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_user(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(state.users.as_ref(), id).await?;
    Ok(Json(user))
}

/// Update a user's name, global role or verification flag
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = UserId, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Nothing to update", body = ErrorResponse),
        (status = 403, description = "Caller may not manage this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, actor, dto), fields(actor_id = %actor.id()))]
pub async fn update_user(
    State(state): State<AppState>,
    RequirePlatformAdmin(actor): RequirePlatformAdmin,
    Path(id): Path<UserId>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<User>, AppError> {
    let target = UserService::get_user(state.users.as_ref(), id).await?;
    ensure_can_manage_user(&actor, target.global_role)?;
    if let Some(role) = dto.global_role {
        ensure_can_grant(&actor, role)?;
    }

    let user = UserService::update_user(state.users.as_ref(), id, dto).await?;
    Ok(Json(user))
}

/// Deactivate a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = UserId, Path, description = "User id")),
    responses(
        (status = 204, description = "User deactivated"),
        (status = 403, description = "Caller may not manage this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, actor), fields(actor_id = %actor.id()))]
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequirePlatformAdmin(actor): RequirePlatformAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    let target = UserService::get_user(state.users.as_ref(), id).await?;
    ensure_can_manage_user(&actor, target.global_role)?;

    UserService::deactivate_user(state.users.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
