use crate::modules::users::controller::{create_user, deactivate_user, get_user, update_user};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_users_router() -> Router<AppState> {
    Router::new().route("/users", post(create_user)).route(
        "/users/{id}",
        get(get_user).patch(update_user).delete(deactivate_user),
    )
}
