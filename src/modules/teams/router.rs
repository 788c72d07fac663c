use crate::modules::teams::controller::{
    add_member, create_team, deactivate_team, get_team, list_members, member_role, remove_member,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

pub fn init_teams_router() -> Router<AppState> {
    Router::new()
        .route("/teams", post(create_team))
        .route("/teams/{id}", get(get_team).delete(deactivate_team))
        .route("/teams/{id}/members", get(list_members).post(add_member))
        .route("/teams/{id}/members/{user_id}", delete(remove_member))
        .route("/teams/{id}/members/{user_id}/role", get(member_role))
}
