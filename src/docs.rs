use axum::{Json, extract::State};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::health::controller::HealthResponse;
use crate::state::AppState;
use catalogflow_models::{
    AccessTokenResponse, AddMemberDto, CreateTeamDto, CreateUserDto, GlobalRole, LoginForm,
    MemberRoleResponse, MessageResponse, RefreshTokenRequest, Team, TeamMember, TeamMemberRole,
    TokenResponse, UpdateUserDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::welcome,
        crate::modules::health::controller::health,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::deactivate_user,
        crate::modules::teams::controller::create_team,
        crate::modules::teams::controller::get_team,
        crate::modules::teams::controller::deactivate_team,
        crate::modules::teams::controller::list_members,
        crate::modules::teams::controller::add_member,
        crate::modules::teams::controller::remove_member,
        crate::modules::teams::controller::member_role,
    ),
    components(
        schemas(
            User,
            GlobalRole,
            CreateUserDto,
            UpdateUserDto,
            Team,
            TeamMember,
            TeamMemberRole,
            CreateTeamDto,
            AddMemberDto,
            MemberRoleResponse,
            LoginForm,
            TokenResponse,
            RefreshTokenRequest,
            AccessTokenResponse,
            MessageResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service banner and liveness"),
        (name = "Authentication", description = "Login, token renewal and current user"),
        (name = "Users", description = "Identity management"),
        (name = "Teams", description = "Teams, memberships and team roles")
    ),
    info(
        title = "CatalogFlow API",
        description = "Authentication and authorization core of CatalogFlow.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// Serves the API document stamped with the configured project version.
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    let mut doc = ApiDoc::openapi();
    doc.info.version = state.server_config.version.clone();
    Json(doc)
}
