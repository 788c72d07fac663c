//! Identity store: user accounts and their credentials at rest.

use anyhow::anyhow;
use catalogflow_core::{
    AppError, PasswordHash, hash_password, verify_dummy_password, verify_password,
};
use catalogflow_db::{NewUser, StoreError, UserChanges, UserCredentials, UserRepository};
use catalogflow_models::{CreateUserDto, GlobalRole, UpdateUserDto, User, UserId, normalize_email};
use tracing::{info, instrument};
use validator::Validate;

pub struct UserService;

impl UserService {
    #[instrument(skip(users))]
    pub async fn find_by_email(
        users: &dyn UserRepository,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        Ok(users.find_by_email(&normalize_email(email)).await?)
    }

    #[instrument(skip(users))]
    pub async fn find_by_id(users: &dyn UserRepository, id: UserId) -> Result<Option<User>, AppError> {
        Ok(users.find_by_id(id).await?)
    }

    pub async fn get_user(users: &dyn UserRepository, id: UserId) -> Result<User, AppError> {
        Self::find_by_id(users, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    /// Looks up the account and password hash used for login.
    pub async fn find_credentials(
        users: &dyn UserRepository,
        email: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        Ok(users.find_credentials(&normalize_email(email)).await?)
    }

    /// Creates an unverified account on behalf of `created_by`.
    #[instrument(skip(users, dto), fields(email = %dto.email, role = dto.global_role.as_str()))]
    pub async fn create_user(
        users: &dyn UserRepository,
        dto: CreateUserDto,
        created_by: Option<UserId>,
    ) -> Result<User, AppError> {
        Self::insert(users, dto, created_by, false).await
    }

    /// Creates the first, verified superadmin account.
    #[instrument(skip(users, password))]
    pub async fn bootstrap_superadmin(
        users: &dyn UserRepository,
        full_name: String,
        email: String,
        password: String,
    ) -> Result<User, AppError> {
        let dto = CreateUserDto {
            full_name,
            email,
            password,
            global_role: GlobalRole::Superadmin,
        };
        Self::insert(users, dto, None, true).await
    }

    async fn insert(
        users: &dyn UserRepository,
        dto: CreateUserDto,
        created_by: Option<UserId>,
        is_verified: bool,
    ) -> Result<User, AppError> {
        dto.validate()
            .map_err(|e| AppError::unprocessable(anyhow!("{}", e)))?;

        let email = normalize_email(&dto.email);
        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let user = users
            .create(NewUser {
                full_name: dto.full_name.trim().to_string(),
                email,
                password_hash,
                global_role: dto.global_role,
                is_verified,
                created_by,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => AppError::conflict(anyhow!("Email already registered")),
                StoreError::MissingReference(_) => {
                    AppError::not_found(anyhow!("Creating user not found"))
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(users, dto))]
    pub async fn update_user(
        users: &dyn UserRepository,
        id: UserId,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow!("No fields to update")));
        }
        dto.validate()
            .map_err(|e| AppError::unprocessable(anyhow!("{}", e)))?;

        let changes = UserChanges {
            full_name: dto.full_name.map(|name| name.trim().to_string()),
            global_role: dto.global_role,
            is_verified: dto.is_verified,
        };

        users
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))
    }

    /// Deactivates the account. Repeating the call is a no-op.
    #[instrument(skip(users))]
    pub async fn deactivate_user(users: &dyn UserRepository, id: UserId) -> Result<User, AppError> {
        let user = users
            .deactivate(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))?;

        info!(user_id = %id, "User deactivated");
        Ok(user)
    }

    /// bcrypt verification, off the async executor.
    pub async fn verify_secret(
        password_hash: PasswordHash,
        plaintext: String,
    ) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || verify_password(&plaintext, &password_hash)).await?
    }

    /// Spends the same bcrypt work as [`Self::verify_secret`] when there is no
    /// account to check against. Always `false`.
    pub async fn verify_absent_secret(plaintext: String) -> Result<bool, AppError> {
        Ok(tokio::task::spawn_blocking(move || verify_dummy_password(&plaintext)).await?)
    }
}
