//! In-memory repositories for tests.
//!
//! They mirror the PostgreSQL semantics: unique email and team name, unique
//! `(team_id, user_id)` membership with reactivation, foreign keys on the
//! audit columns. Each write holds the store's single write lock for its
//! whole read-modify-write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use catalogflow_models::{
    Team, TeamId, TeamMember, TeamMemberId, TeamMemberRole, User, UserId,
};
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::repository::{
    MembershipWrite, NewMembership, NewTeam, NewUser, RemoveOutcome, TeamRepository,
    UserChanges, UserCredentials, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, UserCredentials>,
    teams: HashMap<TeamId, Team>,
    members: Vec<TeamMember>,
}

impl Tables {
    fn user_active(&self, id: UserId) -> bool {
        self.users.get(&id).is_some_and(|c| c.user.is_active)
    }

    fn team_active(&self, id: TeamId) -> bool {
        self.teams.get(&id).is_some_and(|t| t.is_active)
    }

    fn check_user_ref(&self, id: Option<UserId>, constraint: &str) -> Result<(), StoreError> {
        match id {
            Some(id) if !self.users.contains_key(&id) => {
                Err(StoreError::MissingReference(constraint.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Shared backing store for [`MemoryUserRepository`] and
/// [`MemoryTeamRepository`], so memberships can see users.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository {
            store: self.clone(),
        }
    }

    pub fn teams(&self) -> MemoryTeamRepository {
        MemoryTeamRepository {
            store: self.clone(),
        }
    }

    /// Total membership rows, active or not, for a pair.
    pub async fn membership_rows(&self, team_id: TeamId, user_id: UserId) -> usize {
        self.tables
            .read()
            .await
            .members
            .iter()
            .filter(|m| m.team_id == team_id && m.user_id == user_id)
            .count()
    }
}

#[derive(Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

#[derive(Clone)]
pub struct MemoryTeamRepository {
    store: MemoryStore,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.find_credentials(email).await?.map(|c| c.user))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.get(&id).map(|c| c.user.clone()))
    }

    async fn find_credentials(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.store.tables.write().await;

        if tables.users.values().any(|c| c.user.email == new_user.email) {
            return Err(StoreError::Conflict("users_email_key".into()));
        }
        tables.check_user_ref(new_user.created_by, "users_created_by_fkey")?;

        let user = User {
            id: UserId::new(),
            full_name: new_user.full_name,
            email: new_user.email,
            global_role: new_user.global_role,
            is_active: true,
            is_verified: new_user.is_verified,
            created_at: Utc::now(),
            updated_at: None,
            created_by: new_user.created_by,
        };
        tables.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash,
            },
        );

        Ok(user)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut tables = self.store.tables.write().await;
        let Some(entry) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(full_name) = changes.full_name {
            entry.user.full_name = full_name;
        }
        if let Some(global_role) = changes.global_role {
            entry.user.global_role = global_role;
        }
        if let Some(is_verified) = changes.is_verified {
            entry.user.is_verified = is_verified;
        }
        entry.user.updated_at = Some(Utc::now());

        Ok(Some(entry.user.clone()))
    }

    async fn deactivate(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let mut tables = self.store.tables.write().await;
        let Some(entry) = tables.users.get_mut(&id) else {
            return Ok(None);
        };

        if entry.user.is_active {
            entry.user.is_active = false;
            entry.user.updated_at = Some(Utc::now());
        }

        Ok(Some(entry.user.clone()))
    }
}

#[async_trait]
impl TeamRepository for MemoryTeamRepository {
    async fn create_team(&self, new_team: NewTeam) -> Result<Team, StoreError> {
        let mut tables = self.store.tables.write().await;

        if tables.teams.values().any(|t| t.name == new_team.name) {
            return Err(StoreError::Conflict("teams_name_key".into()));
        }
        tables.check_user_ref(new_team.created_by, "teams_created_by_fkey")?;

        let team = Team {
            id: TeamId::new(),
            name: new_team.name,
            description: new_team.description,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            created_by: new_team.created_by,
        };
        tables.teams.insert(team.id, team.clone());

        Ok(team)
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables.teams.get(&id).cloned())
    }

    async fn deactivate_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let mut tables = self.store.tables.write().await;
        let Some(team) = tables.teams.get_mut(&id) else {
            return Ok(None);
        };

        if team.is_active {
            team.is_active = false;
            team.updated_at = Some(Utc::now());
        }

        Ok(Some(team.clone()))
    }

    async fn add_member(&self, membership: NewMembership) -> Result<MembershipWrite, StoreError> {
        let mut tables = self.store.tables.write().await;

        if !tables.team_active(membership.team_id) || !tables.user_active(membership.user_id) {
            return Ok(MembershipWrite::MissingParty);
        }
        tables.check_user_ref(membership.added_by, "team_members_added_by_fkey")?;

        let existing = tables
            .members
            .iter_mut()
            .find(|m| m.team_id == membership.team_id && m.user_id == membership.user_id);

        match existing {
            Some(member) if member.is_active => Ok(MembershipWrite::AlreadyActive),
            Some(member) => {
                member.role = membership.role;
                member.added_by = membership.added_by;
                member.added_at = Utc::now();
                member.is_active = true;
                Ok(MembershipWrite::Added(member.clone()))
            }
            None => {
                let member = TeamMember {
                    id: TeamMemberId::new(),
                    team_id: membership.team_id,
                    user_id: membership.user_id,
                    role: membership.role,
                    is_active: true,
                    added_by: membership.added_by,
                    added_at: Utc::now(),
                };
                tables.members.push(member.clone());
                Ok(MembershipWrite::Added(member))
            }
        }
    }

    async fn remove_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<RemoveOutcome, StoreError> {
        let mut tables = self.store.tables.write().await;

        let outcome = match tables
            .members
            .iter_mut()
            .find(|m| m.team_id == team_id && m.user_id == user_id)
        {
            Some(member) if member.is_active => {
                member.is_active = false;
                RemoveOutcome::Deactivated
            }
            Some(_) => RemoveOutcome::AlreadyInactive,
            None => RemoveOutcome::Missing,
        };

        Ok(outcome)
    }

    async fn effective_role(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<Option<TeamMemberRole>, StoreError> {
        let tables = self.store.tables.read().await;

        if !tables.team_active(team_id) {
            return Ok(None);
        }

        Ok(tables
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.user_id == user_id && m.is_active)
            .map(|m| m.role))
    }

    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, StoreError> {
        let tables = self.store.tables.read().await;
        Ok(tables
            .members
            .iter()
            .filter(|m| m.team_id == team_id && m.is_active)
            .cloned()
            .collect())
    }
}
