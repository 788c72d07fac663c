use catalogflow::logging::init_tracing;
use catalogflow::router::init_router;
use catalogflow::state::init_app_state;
use catalogflow_config::{DatabaseConfig, JwtConfig, ServerConfig};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Misconfiguration aborts startup before anything binds.
    let server_config = ServerConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;

    init_tracing(&server_config.log_dir)?;

    let addr = server_config.addr;
    let state = init_app_state(&db_config, jwt_config, server_config).await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server running");
    info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
