//! User domain models and DTOs.
//!
//! A [`User`] carries a single platform-wide [`GlobalRole`]. Team-scoped
//! privileges live on team memberships (see [`crate::teams`]) and are never
//! folded into this enum.

use crate::ids::UserId;
use crate::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Platform-wide role, ordered from most to least privileged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "auth.global_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GlobalRole {
    Superadmin,
    Admin,
    TeamLeader,
    TeamMember,
    #[default]
    Viewer,
}

impl GlobalRole {
    pub const ALL: [GlobalRole; 5] = [
        GlobalRole::Superadmin,
        GlobalRole::Admin,
        GlobalRole::TeamLeader,
        GlobalRole::TeamMember,
        GlobalRole::Viewer,
    ];

    /// Privilege rank; lower is more privileged.
    pub fn rank(self) -> u8 {
        match self {
            GlobalRole::Superadmin => 0,
            GlobalRole::Admin => 1,
            GlobalRole::TeamLeader => 2,
            GlobalRole::TeamMember => 3,
            GlobalRole::Viewer => 4,
        }
    }

    /// Strictly more privileged than `other`.
    pub fn outranks(self, other: GlobalRole) -> bool {
        self.rank() < other.rank()
    }

    /// Superadmins and admins manage the whole platform.
    pub fn is_platform_admin(self) -> bool {
        matches!(self, GlobalRole::Superadmin | GlobalRole::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlobalRole::Superadmin => "superadmin",
            GlobalRole::Admin => "admin",
            GlobalRole::TeamLeader => "team_leader",
            GlobalRole::TeamMember => "team_member",
            GlobalRole::Viewer => "viewer",
        }
    }
}

/// A user account as exposed outside the identity store.
///
/// The password hash is deliberately not part of this type.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub global_role: GlobalRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Audit only: the account that created this one.
    pub created_by: Option<UserId>,
}

/// DTO for creating a user.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub full_name: String,
    #[validate(email, length(max = 100))]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    pub global_role: GlobalRole,
}

/// DTO for partial user updates. Absent fields are left unchanged.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub full_name: Option<String>,
    pub global_role: Option<GlobalRole>,
    pub is_verified: Option<bool>,
}

impl UpdateUserDto {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.global_role.is_none() && self.is_verified.is_none()
    }
}

/// Canonical form of an email used as the login identifier.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_full_name_fails_validation() {
        let dto = CreateUserDto {
            full_name: "   ".into(),
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
            global_role: GlobalRole::Viewer,
        };
        assert!(dto.validate().is_err());

        let patch = UpdateUserDto {
            full_name: Some("   ".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(UpdateUserDto::default().validate().is_ok());
    }

    #[test]
    fn test_global_role_ordering() {
        assert!(GlobalRole::Superadmin.outranks(GlobalRole::Admin));
        assert!(GlobalRole::Admin.outranks(GlobalRole::TeamLeader));
        assert!(GlobalRole::TeamMember.outranks(GlobalRole::Viewer));
        assert!(!GlobalRole::Viewer.outranks(GlobalRole::Viewer));
        assert!(!GlobalRole::TeamLeader.outranks(GlobalRole::Admin));
    }

    #[test]
    fn test_global_role_serde_names() {
        for role in GlobalRole::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        let role: GlobalRole = serde_json::from_str(r#""team_leader""#).unwrap();
        assert_eq!(role, GlobalRole::TeamLeader);
    }

    #[test]
    fn test_default_global_role_is_viewer() {
        let dto: CreateUserDto = serde_json::from_str(
            r#"{"full_name":"Ada","email":"ada@example.com","password":"password123"}"#,
        )
        .unwrap();
        assert_eq!(dto.global_role, GlobalRole::Viewer);
    }

    #[test]
    fn test_platform_admins() {
        assert!(GlobalRole::Superadmin.is_platform_admin());
        assert!(GlobalRole::Admin.is_platform_admin());
        assert!(!GlobalRole::TeamLeader.is_platform_admin());
    }

    #[test]
    fn test_create_user_dto_validation() {
        let dto = CreateUserDto {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "password123".into(),
            global_role: GlobalRole::Viewer,
        };
        assert!(dto.validate().is_ok());

        let bad_email = CreateUserDto {
            email: "not-an-email".into(),
            ..dto.clone()
        };
        assert!(bad_email.validate().is_err());

        let short_password = CreateUserDto {
            password: "short".into(),
            ..dto
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_update_user_dto_is_empty() {
        assert!(UpdateUserDto::default().is_empty());
        let dto = UpdateUserDto {
            is_verified: Some(true),
            ..Default::default()
        };
        assert!(!dto.is_empty());
    }
}
