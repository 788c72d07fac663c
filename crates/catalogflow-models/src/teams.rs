//! Team and team membership models and DTOs.

use crate::ids::{TeamId, TeamMemberId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::not_blank;

/// Role held inside a single team. Independent of [`crate::users::GlobalRole`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "auth.team_member_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TeamMemberRole {
    Leader,
    #[default]
    Member,
    Viewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<UserId>,
}

/// Link between a team and a user. Soft-deleted through `is_active`; at most
/// one row exists per `(team_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub team_id: TeamId,
    pub user_id: UserId,
    pub role: TeamMemberRole,
    pub is_active: bool,
    pub added_by: Option<UserId>,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeamDto {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddMemberDto {
    pub user_id: UserId,
    #[serde(default)]
    pub role: TeamMemberRole,
}

/// Answer to "which role does this user hold in this team?".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberRoleResponse {
    pub team_id: TeamId,
    pub user_id: UserId,
    /// `null` when the user has no active membership.
    pub role: Option<TeamMemberRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_team_name_fails_validation() {
        let dto = CreateTeamDto {
            name: " \t ".into(),
            description: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_team_member_role_names() {
        assert_eq!(serde_json::to_string(&TeamMemberRole::Leader).unwrap(), r#""leader""#);
        let role: TeamMemberRole = serde_json::from_str(r#""viewer""#).unwrap();
        assert_eq!(role, TeamMemberRole::Viewer);
    }

    #[test]
    fn test_add_member_defaults_to_member() {
        let dto: AddMemberDto =
            serde_json::from_str(r#"{"user_id":"12345678-1234-1234-1234-123456789abc"}"#).unwrap();
        assert_eq!(dto.role, TeamMemberRole::Member);
    }

    #[test]
    fn test_create_team_dto_validation() {
        let dto = CreateTeamDto {
            name: "Catalog Ops".into(),
            description: None,
        };
        assert!(dto.validate().is_ok());

        let empty = CreateTeamDto {
            name: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_member_role_response_null_role() {
        let response = MemberRoleResponse {
            team_id: TeamId::new(),
            user_id: UserId::new(),
            role: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["role"].is_null());
    }
}
