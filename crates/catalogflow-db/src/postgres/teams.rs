use std::time::Duration;

use async_trait::async_trait;
use catalogflow_models::{Team, TeamId, TeamMember, TeamMemberRole, UserId};
use sqlx::PgPool;
use tracing::instrument;

use crate::error::StoreError;
use crate::repository::{MembershipWrite, NewMembership, NewTeam, RemoveOutcome, TeamRepository};
use crate::timeout::with_timeout;

const TEAM_COLUMNS: &str = "id, name, description, is_active, created_at, updated_at, created_by";

// Inserts the membership only when both parties are active. On the unique
// pair it reactivates a soft-deleted row and leaves an active one untouched,
// in which case no row is returned.
const UPSERT_MEMBER: &str = r#"
    INSERT INTO auth.team_members (team_id, user_id, role, added_by)
    SELECT $1, $2, $3, $4
    WHERE EXISTS (SELECT 1 FROM auth.teams WHERE id = $1 AND is_active)
      AND EXISTS (SELECT 1 FROM auth.users WHERE id = $2 AND is_active)
    ON CONFLICT (team_id, user_id) DO UPDATE
    SET role = EXCLUDED.role,
        added_by = EXCLUDED.added_by,
        added_at = NOW(),
        is_active = TRUE
    WHERE NOT auth.team_members.is_active
    RETURNING id, team_id, user_id, role, is_active, added_by, added_at
"#;

const PARTIES_ACTIVE: &str = r#"
    SELECT EXISTS (SELECT 1 FROM auth.teams WHERE id = $1 AND is_active)
       AND EXISTS (SELECT 1 FROM auth.users WHERE id = $2 AND is_active)
"#;

/// `auth.teams` / `auth.team_members` backed membership authority.
#[derive(Clone)]
pub struct PgTeamRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    #[instrument(skip(self, new_team), fields(name = %new_team.name))]
    async fn create_team(&self, new_team: NewTeam) -> Result<Team, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO auth.teams (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING {TEAM_COLUMNS}
            "#
        );
        with_timeout(self.timeout, async {
            let team = sqlx::query_as::<_, Team>(&sql)
                .bind(&new_team.name)
                .bind(&new_team.description)
                .bind(new_team.created_by)
                .fetch_one(&self.pool)
                .await?;
            Ok::<_, StoreError>(team)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM auth.teams WHERE id = $1");
        with_timeout(self.timeout, async {
            let team = sqlx::query_as::<_, Team>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(team)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn deactivate_team(&self, id: TeamId) -> Result<Option<Team>, StoreError> {
        let sql = format!(
            r#"
            UPDATE auth.teams
            SET updated_at = CASE WHEN is_active THEN NOW() ELSE updated_at END,
                is_active = FALSE
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        );
        with_timeout(self.timeout, async {
            let team = sqlx::query_as::<_, Team>(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok::<_, StoreError>(team)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn add_member(&self, membership: NewMembership) -> Result<MembershipWrite, StoreError> {
        with_timeout(self.timeout, async {
            let mut tx = self.pool.begin().await?;

            let added = sqlx::query_as::<_, TeamMember>(UPSERT_MEMBER)
                .bind(membership.team_id)
                .bind(membership.user_id)
                .bind(membership.role)
                .bind(membership.added_by)
                .fetch_optional(&mut *tx)
                .await?;

            let outcome = match added {
                Some(member) => MembershipWrite::Added(member),
                None => {
                    let parties_active: bool = sqlx::query_scalar(PARTIES_ACTIVE)
                        .bind(membership.team_id)
                        .bind(membership.user_id)
                        .fetch_one(&mut *tx)
                        .await?;
                    if parties_active {
                        MembershipWrite::AlreadyActive
                    } else {
                        MembershipWrite::MissingParty
                    }
                }
            };

            tx.commit().await?;
            Ok::<_, StoreError>(outcome)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove_member(
        &self,
        team_id: TeamId,
        user_id: UserId,
    ) -> Result<RemoveOutcome, StoreError> {
        with_timeout(self.timeout, async {
            let deactivated = sqlx::query(
                r#"
                UPDATE auth.team_members
                SET is_active = FALSE
                WHERE team_id = $1 AND user_id = $2 AND is_active
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

            if deactivated > 0 {
                return Ok(RemoveOutcome::Deactivated);
            }

            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM auth.team_members WHERE team_id = $1 AND user_id = $2)",
            )
            .bind(team_id)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

            Ok::<_, StoreError>(if exists {
                RemoveOutcome::AlreadyInactive
            } else {
                RemoveOutcome::Missing
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn effective_role(
        &self,
        user_id: UserId,
        team_id: TeamId,
    ) -> Result<Option<TeamMemberRole>, StoreError> {
        with_timeout(self.timeout, async {
            let role = sqlx::query_scalar::<_, TeamMemberRole>(
                r#"
                SELECT m.role
                FROM auth.team_members m
                JOIN auth.teams t ON t.id = m.team_id
                WHERE m.team_id = $1 AND m.user_id = $2 AND m.is_active AND t.is_active
                "#,
            )
            .bind(team_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok::<_, StoreError>(role)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn list_members(&self, team_id: TeamId) -> Result<Vec<TeamMember>, StoreError> {
        with_timeout(self.timeout, async {
            let members = sqlx::query_as::<_, TeamMember>(
                r#"
                SELECT id, team_id, user_id, role, is_active, added_by, added_at
                FROM auth.team_members
                WHERE team_id = $1 AND is_active
                ORDER BY added_at, id
                "#,
            )
            .bind(team_id)
            .fetch_all(&self.pool)
            .await?;
            Ok::<_, StoreError>(members)
        })
        .await
    }
}
