use axum::{Json, extract::State};
use catalogflow_models::MessageResponse;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = MessageResponse)),
    tag = "Health"
)]
pub async fn welcome(State(state): State<AppState>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Welcome to {}", state.server_config.project_name),
    })
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        message: format!("{} API is running", state.server_config.project_name),
    })
}
