//! Membership authority: teams, memberships and team-scoped roles.
//!
//! Memberships are soft-deleted and reactivated in place, so a
//! `(team, user)` pair owns at most one row for its whole history.

use anyhow::anyhow;
use catalogflow_core::AppError;
use catalogflow_db::{
    MembershipWrite, NewMembership, NewTeam, RemoveOutcome, StoreError, TeamRepository,
};
use catalogflow_models::{
    AddMemberDto, CreateTeamDto, Team, TeamId, TeamMember, TeamMemberRole, UserId,
};
use tracing::{info, instrument};
use validator::Validate;

pub struct TeamService;

impl TeamService {
    #[instrument(skip(teams, dto), fields(name = %dto.name))]
    pub async fn create_team(
        teams: &dyn TeamRepository,
        dto: CreateTeamDto,
        created_by: Option<UserId>,
    ) -> Result<Team, AppError> {
        dto.validate()
            .map_err(|e| AppError::unprocessable(anyhow!("{}", e)))?;

        let team = teams
            .create_team(NewTeam {
                name: dto.name.trim().to_string(),
                description: dto.description,
                created_by,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    AppError::conflict(anyhow!("Team name already exists"))
                }
                other => other.into(),
            })?;

        info!(team_id = %team.id, "Team created");
        Ok(team)
    }

    #[instrument(skip(teams))]
    pub async fn get_team(teams: &dyn TeamRepository, id: TeamId) -> Result<Team, AppError> {
        teams
            .find_team(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Team with id {} not found", id)))
    }

    /// Deactivates the team. Repeating the call is a no-op.
    #[instrument(skip(teams))]
    pub async fn deactivate_team(teams: &dyn TeamRepository, id: TeamId) -> Result<Team, AppError> {
        let team = teams
            .deactivate_team(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Team with id {} not found", id)))?;

        info!(team_id = %id, "Team deactivated");
        Ok(team)
    }

    /// Adds `dto.user_id` to the team, reactivating a removed membership with
    /// the new role and provenance.
    #[instrument(skip(teams, dto), fields(user_id = %dto.user_id, role = ?dto.role))]
    pub async fn add_member(
        teams: &dyn TeamRepository,
        team_id: TeamId,
        dto: AddMemberDto,
        added_by: Option<UserId>,
    ) -> Result<TeamMember, AppError> {
        let write = teams
            .add_member(NewMembership {
                team_id,
                user_id: dto.user_id,
                role: dto.role,
                added_by,
            })
            .await?;

        match write {
            MembershipWrite::Added(member) => {
                info!(member_id = %member.id, "Team member added");
                Ok(member)
            }
            MembershipWrite::AlreadyActive => Err(AppError::conflict(anyhow!(
                "User is already an active member of this team"
            ))),
            MembershipWrite::MissingParty => Err(AppError::not_found(anyhow!(
                "Team or user not found or inactive"
            ))),
        }
    }

    /// Soft-deletes the membership. Removing an already removed member is a
    /// no-op; a pair that never had a membership is `NotFound`.
    #[instrument(skip(teams))]
    pub async fn remove_member(
        teams: &dyn TeamRepository,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<(), AppError> {
        match teams.remove_member(team_id, user_id).await? {
            RemoveOutcome::Deactivated => {
                info!("Team member removed");
                Ok(())
            }
            RemoveOutcome::AlreadyInactive => Ok(()),
            RemoveOutcome::Missing => Err(AppError::not_found(anyhow!("Membership not found"))),
        }
    }

    /// The role of the user's active membership in an active team. Global
    /// roles are not consulted.
    #[instrument(skip(teams))]
    pub async fn effective_role(
        teams: &dyn TeamRepository,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<Option<TeamMemberRole>, AppError> {
        Ok(teams.effective_role(user_id, team_id).await?)
    }

    #[instrument(skip(teams))]
    pub async fn list_members(
        teams: &dyn TeamRepository,
        team_id: TeamId,
    ) -> Result<Vec<TeamMember>, AppError> {
        Self::get_team(teams, team_id).await?;
        Ok(teams.list_members(team_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use catalogflow_db::MemoryStore;

    fn dto(name: &str) -> CreateTeamDto {
        CreateTeamDto {
            name: name.into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_team_trims_name_and_conflicts_on_trimmed_duplicate() {
        let store = MemoryStore::new();
        let teams = store.teams();

        let team = TeamService::create_team(&teams, dto("  Pricing "), None)
            .await
            .unwrap();
        assert_eq!(team.name, "Pricing");
        assert!(team.is_active);

        let err = TeamService::create_team(&teams, dto("Pricing"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_create_team_with_blank_name_is_unprocessable() {
        let store = MemoryStore::new();
        let teams = store.teams();

        let err = TeamService::create_team(&teams, dto("   "), None)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_members_of_unknown_team_is_not_found() {
        let store = MemoryStore::new();

        let err = TeamService::list_members(&store.teams(), TeamId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_deactivate_team_twice_is_noop() {
        let store = MemoryStore::new();
        let teams = store.teams();
        let team = TeamService::create_team(&teams, dto("Ops"), None)
            .await
            .unwrap();

        let first = TeamService::deactivate_team(&teams, team.id).await.unwrap();
        let second = TeamService::deactivate_team(&teams, team.id).await.unwrap();

        assert!(!first.is_active);
        assert!(!second.is_active);
        assert_eq!(first.updated_at, second.updated_at);
    }
}
