use std::time::Duration;

use async_trait::async_trait;
use catalogflow_core::PasswordHash;
use catalogflow_models::{User, UserId};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use crate::error::StoreError;
use crate::repository::{NewUser, UserChanges, UserCredentials, UserRepository};
use crate::timeout::with_timeout;

const USER_COLUMNS: &str =
    "id, full_name, email, global_role, is_active, is_verified, created_at, updated_at, created_by";

#[derive(FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// `auth.users` backed identity store.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM auth.users WHERE email = $1");
        with_timeout(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(user)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM auth.users WHERE id = $1");
        with_timeout(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(user)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM auth.users WHERE email = $1");
        with_timeout(self.timeout, async {
            let row = sqlx::query_as::<_, CredentialsRow>(&sql)
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(row.map(|row| UserCredentials {
                user: row.user,
                password_hash: PasswordHash::from_stored(row.password_hash),
            }))
        })
        .await
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO auth.users (full_name, email, password_hash, global_role, is_verified, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        );
        with_timeout(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(&new_user.full_name)
                .bind(&new_user.email)
                .bind(new_user.password_hash.as_str())
                .bind(new_user.global_role)
                .bind(new_user.is_verified)
                .bind(new_user.created_by)
                .fetch_one(&self.pool)
                .await?;
            Ok::<_, StoreError>(user)
        })
        .await
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"
            UPDATE auth.users
            SET full_name = COALESCE($2, full_name),
                global_role = COALESCE($3, global_role),
                is_verified = COALESCE($4, is_verified),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        with_timeout(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .bind(changes.full_name)
                .bind(changes.global_role)
                .bind(changes.is_verified)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(user)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn deactivate(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"
            UPDATE auth.users
            SET updated_at = CASE WHEN is_active THEN NOW() ELSE updated_at END,
                is_active = FALSE
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        with_timeout(self.timeout, async {
            let user = sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(user)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalogflow_models::GlobalRole;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            full_name: "Ada Lovelace".into(),
            email: email.into(),
            password_hash: PasswordHash::from_stored("$2b$04$placeholderplaceholderplaceholderplaceholderpl"),
            global_role: GlobalRole::Viewer,
            is_verified: false,
            created_by: None,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires running PostgreSQL
    async fn test_create_and_find(pool: PgPool) {
        let repo = PgUserRepository::new(pool, Duration::from_secs(5));

        let user = repo.create(new_user("ada@example.com")).await.unwrap();
        assert!(user.is_active);
        assert!(user.updated_at.is_none());

        let found = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        let creds = repo.find_credentials("ada@example.com").await.unwrap().unwrap();
        assert_eq!(creds.user.id, user.id);
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires running PostgreSQL
    async fn test_duplicate_email_conflicts(pool: PgPool) {
        let repo = PgUserRepository::new(pool, Duration::from_secs(5));

        repo.create(new_user("dup@example.com")).await.unwrap();
        let err = repo.create(new_user("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires running PostgreSQL
    async fn test_unknown_creator_is_missing_reference(pool: PgPool) {
        let repo = PgUserRepository::new(pool, Duration::from_secs(5));

        let mut input = new_user("orphan@example.com");
        input.created_by = Some(UserId::new());
        let err = repo.create(input).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires running PostgreSQL
    async fn test_deactivate_is_idempotent(pool: PgPool) {
        let repo = PgUserRepository::new(pool, Duration::from_secs(5));
        let user = repo.create(new_user("gone@example.com")).await.unwrap();

        let first = repo.deactivate(user.id).await.unwrap().unwrap();
        let second = repo.deactivate(user.id).await.unwrap().unwrap();
        assert!(!first.is_active);
        assert_eq!(first.updated_at, second.updated_at);
    }
}
