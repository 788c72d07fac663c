//! Repository traits for the identity store and the membership authority.
//!
//! Services depend on these traits rather than on a concrete store, so the
//! HTTP layer can run against PostgreSQL in production and against the
//! in-memory implementations in tests.

use async_trait::async_trait;
use catalogflow_core::PasswordHash;
use catalogflow_models::{GlobalRole, Team, TeamId, TeamMember, TeamMemberRole, User, UserId};

use crate::error::StoreError;

/// A user row ready to insert. The email is expected to be normalized and
/// the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub global_role: GlobalRole,
    pub is_verified: bool,
    pub created_by: Option<UserId>,
}

/// Partial update of a user. `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub global_role: Option<GlobalRole>,
    pub is_verified: Option<bool>,
}

/// A user together with its stored password hash. Only login reads this.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<UserId>,
}

#[derive(Debug, Clone)]
pub struct NewMembership {
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: TeamMemberRole,
    pub added_by: Option<UserId>,
}

/// Result of an add-member upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipWrite {
    /// Inserted, or a soft-deleted row was reactivated.
    Added(TeamMember),
    /// An active membership for the pair already exists.
    AlreadyActive,
    /// The team or the user is missing or inactive.
    MissingParty,
}

/// Result of a remove-member soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deactivated,
    AlreadyInactive,
    /// No membership row ever existed for the pair.
    Missing,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Looks up by normalized email, including the password hash.
    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;

    /// Fails with [`StoreError::Conflict`] on a duplicate email and
    /// [`StoreError::MissingReference`] when `created_by` does not exist.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Returns `None` when the user does not exist.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError>;

    /// Clears `is_active`. Idempotent; returns `None` when the user does not
    /// exist.
    async fn deactivate(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Fails with [`StoreError::Conflict`] on a duplicate name.
    async fn create_team(&self, new_team: NewTeam) -> Result<Team, StoreError>;

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;

    /// Clears `is_active`. Idempotent; returns `None` when the team does not
    /// exist.
    async fn deactivate_team(&self, id: TeamId) -> Result<Option<Team>, StoreError>;

    /// Inserts the membership, or reactivates a soft-deleted one, atomically.
    async fn add_member(&self, membership: NewMembership) -> Result<MembershipWrite, StoreError>;

    async fn remove_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<RemoveOutcome, StoreError>;

    /// Role of the user's active membership in an active team.
    async fn effective_role(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<Option<TeamMemberRole>, StoreError>;

    /// Active memberships of the team, oldest first.
    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, StoreError>;
}
