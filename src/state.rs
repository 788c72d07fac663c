use std::sync::Arc;

use catalogflow_config::{DatabaseConfig, JwtConfig, ServerConfig};
use catalogflow_db::{
    PgTeamRepository, PgUserRepository, TeamRepository, UserRepository, init_db_pool,
};

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub jwt_config: JwtConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        jwt_config: JwtConfig,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            users,
            teams,
            jwt_config,
            server_config,
        }
    }
}

/// Builds the production state over a PostgreSQL pool.
pub async fn init_app_state(
    db_config: &DatabaseConfig,
    jwt_config: JwtConfig,
    server_config: ServerConfig,
) -> anyhow::Result<AppState> {
    let pool = init_db_pool(db_config).await?;

    Ok(AppState::new(
        Arc::new(PgUserRepository::new(pool.clone(), db_config.store_timeout)),
        Arc::new(PgTeamRepository::new(pool, db_config.store_timeout)),
        jwt_config,
        server_config,
    ))
}
