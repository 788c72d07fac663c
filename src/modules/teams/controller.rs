use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use catalogflow_core::AppError;
use catalogflow_models::{
    AddMemberDto, CreateTeamDto, MemberRoleResponse, Team, TeamId, TeamMember, UserId,
};
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequirePlatformAdmin, RequireTeamCreator};
use crate::middleware::role::ensure_can_manage_members;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teams::service::TeamService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a team
#[utoipa::path(
    post,
    path = "/teams",
    request_body = CreateTeamDto,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 403, description = "Caller may not create teams", body = ErrorResponse),
        (status = 409, description = "Team name already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, actor, dto), fields(actor_id = %actor.id()))]
pub async fn create_team(
    State(state): State<AppState>,
    RequireTeamCreator(actor): RequireTeamCreator,
    ValidatedJson(dto): ValidatedJson<CreateTeamDto>,
) -> Result<(StatusCode, Json<Team>), AppError> {
    let team = TeamService::create_team(state.teams.as_ref(), dto, Some(actor.id())).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

/// Get a team by id
#[utoipa::path(
    get,
    path = "/teams/{id}",
    params(("id" = TeamId, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team", body = Team),
        (status = 404, description = "Team not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_team(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<TeamId>,
) -> Result<Json<Team>, AppError> {
    let team = TeamService::get_team(state.teams.as_ref(), id).await?;
    Ok(Json(team))
}

/// Deactivate a team
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    params(("id" = TeamId, Path, description = "Team id")),
    responses(
        (status = 204, description = "Team deactivated"),
        (status = 403, description = "Administrator required", body = ErrorResponse),
        (status = 404, description = "Team not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, actor), fields(actor_id = %actor.id()))]
pub async fn deactivate_team(
    State(state): State<AppState>,
    RequirePlatformAdmin(actor): RequirePlatformAdmin,
    Path(id): Path<TeamId>,
) -> Result<StatusCode, AppError> {
    TeamService::deactivate_team(state.teams.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a team's active members
#[utoipa::path(
    get,
    path = "/teams/{id}/members",
    params(("id" = TeamId, Path, description = "Team id")),
    responses(
        (status = 200, description = "Active memberships", body = Vec<TeamMember>),
        (status = 404, description = "Team not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_members(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<TeamId>,
) -> Result<Json<Vec<TeamMember>>, AppError> {
    let members = TeamService::list_members(state.teams.as_ref(), id).await?;
    Ok(Json(members))
}

/// Add a user to a team
#[utoipa::path(
    post,
    path = "/teams/{id}/members",
    params(("id" = TeamId, Path, description = "Team id")),
    request_body = AddMemberDto,
    responses(
        (status = 201, description = "Membership created or reactivated", body = TeamMember),
        (status = 403, description = "Team leader or administrator required", body = ErrorResponse),
        (status = 404, description = "Team or user not found or inactive", body = ErrorResponse),
        (status = 409, description = "Already an active member", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, actor, dto), fields(actor_id = %actor.id()))]
pub async fn add_member(
    State(state): State<AppState>,
    actor: AuthUser,
    Path(team_id): Path<TeamId>,
    ValidatedJson(dto): ValidatedJson<AddMemberDto>,
) -> Result<(StatusCode, Json<TeamMember>), AppError> {
    ensure_can_manage_members(state.teams.as_ref(), &actor, team_id).await?;

    let member =
        TeamService::add_member(state.teams.as_ref(), team_id, dto, Some(actor.id())).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Remove a user from a team
#[utoipa::path(
    delete,
    path = "/teams/{id}/members/{user_id}",
    params(
        ("id" = TeamId, Path, description = "Team id"),
        ("user_id" = UserId, Path, description = "User id")
    ),
    responses(
        (status = 204, description = "Membership removed (or already removed)"),
        (status = 403, description = "Team leader or administrator required", body = ErrorResponse),
        (status = 404, description = "Membership not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, actor), fields(actor_id = %actor.id()))]
pub async fn remove_member(
    State(state): State<AppState>,
    actor: AuthUser,
    Path((team_id, user_id)): Path<(TeamId, UserId)>,
) -> Result<StatusCode, AppError> {
    ensure_can_manage_members(state.teams.as_ref(), &actor, team_id).await?;

    TeamService::remove_member(state.teams.as_ref(), team_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a user's role in a team
#[utoipa::path(
    get,
    path = "/teams/{id}/members/{user_id}/role",
    params(
        ("id" = TeamId, Path, description = "Team id"),
        ("user_id" = UserId, Path, description = "User id")
    ),
    responses(
        (status = 200, description = "Role of the active membership, or null", body = MemberRoleResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
#[instrument(skip(state, _auth_user))]
pub async fn member_role(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path((team_id, user_id)): Path<(TeamId, UserId)>,
) -> Result<Json<MemberRoleResponse>, AppError> {
    let role = TeamService::effective_role(state.teams.as_ref(), user_id, team_id).await?;
    Ok(Json(MemberRoleResponse {
        team_id,
        user_id,
        role,
    }))
}
