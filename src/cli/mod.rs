//! Administrative commands run outside the HTTP server.

use anyhow::{Context, anyhow};
use catalogflow_config::DatabaseConfig;
use catalogflow_db::{PgUserRepository, init_db_pool, run_migrations};
use catalogflow_models::User;
use tracing::info;

use crate::modules::users::service::UserService;

/// Applies all pending schema migrations.
pub async fn migrate(db_config: &DatabaseConfig) -> anyhow::Result<()> {
    let pool = init_db_pool(db_config)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool).await.context("migration failed")?;
    Ok(())
}

/// Creates the first verified superadmin account.
///
/// Fails if the email is already registered.
pub async fn create_superadmin(
    db_config: &DatabaseConfig,
    full_name: String,
    email: String,
    password: String,
) -> anyhow::Result<User> {
    let pool = init_db_pool(db_config)
        .await
        .context("failed to connect to database")?;
    let users = PgUserRepository::new(pool, db_config.store_timeout);

    let user = UserService::bootstrap_superadmin(&users, full_name, email, password)
        .await
        .map_err(|e| anyhow!("{}", e.error))?;

    info!(user_id = %user.id, "Superadmin created");
    Ok(user)
}
