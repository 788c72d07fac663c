//! # CatalogFlow Models
//!
//! Domain models and DTOs for the CatalogFlow API.
//!
//! # Modules
//!
//! - [`auth`]: Login, token and renewal DTOs
//! - [`ids`]: Strongly typed UUID identifiers
//! - [`teams`]: Teams, memberships and team-scoped roles
//! - [`users`]: User accounts and platform-wide roles
//! - [`validation`]: Custom validation rules
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_models::{GlobalRole, TeamMemberRole, UserId};
//!
//! assert!(GlobalRole::Admin.outranks(GlobalRole::TeamLeader));
//! ```

pub mod auth;
pub mod ids;
pub mod teams;
pub mod users;
pub mod validation;

pub use auth::{
    AccessTokenResponse, LoginForm, MessageResponse, RefreshTokenRequest, TokenResponse,
};
pub use ids::{TeamId, TeamMemberId, UserId};
pub use teams::{AddMemberDto, CreateTeamDto, MemberRoleResponse, Team, TeamMember, TeamMemberRole};
pub use users::{CreateUserDto, GlobalRole, UpdateUserDto, User, normalize_email};
