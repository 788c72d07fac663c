//! # CatalogFlow DB
//!
//! Persistence for the CatalogFlow API.
//!
//! - [`init_db_pool`] / [`run_migrations`]: PostgreSQL pool and schema
//! - [`repository`]: `UserRepository` and `TeamRepository` traits
//! - [`postgres`]: sqlx implementations over the `auth` schema
//! - [`timeout`]: per-call store timeout
//! - `memory` (feature `test-utils`): in-memory implementations
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_config::DatabaseConfig;
//! use catalogflow_db::{PgUserRepository, init_db_pool};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_db_pool(&config).await?;
//! let users = PgUserRepository::new(pool, config.store_timeout);
//! ```

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod timeout;

use catalogflow_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::{MemoryStore, MemoryTeamRepository, MemoryUserRepository};
pub use postgres::{PgTeamRepository, PgUserRepository};
pub use repository::{
    MembershipWrite, NewMembership, NewTeam, NewUser, RemoveOutcome, TeamRepository,
    UserChanges, UserCredentials, UserRepository,
};
pub use timeout::with_timeout;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Connects a pool sized and bounded by `config`.
///
/// Acquiring a connection waits at most `store_timeout`.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!(max_connections = config.max_connections, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.url)
        .await?;

    tracing::info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Applies the embedded `auth` schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}
