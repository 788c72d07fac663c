use crate::modules::health::controller::{health, welcome};
use crate::state::AppState;
use axum::{Router, routing::get};

pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/api/v1/health", get(health))
}
