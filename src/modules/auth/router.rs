use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, me, refresh_token};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh_token))
        .route("/me", get(me))
}
