use crate::docs::openapi_json;
use crate::logging::logging_middleware;
use crate::modules::auth::router::init_auth_router;
use crate::modules::health::router::init_health_router;
use crate::modules::teams::router::init_teams_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(init_health_router())
        .nest("/auth", init_auth_router())
        .merge(init_users_router())
        .merge(init_teams_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
}
