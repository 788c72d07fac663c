//! Authorization policy.
//!
//! Global roles and team roles stay independent; each decision below picks
//! which of the two it consults. The membership store only answers "which
//! team role does this user hold", it never decides.

use catalogflow_core::AppError;
use catalogflow_db::TeamRepository;
use catalogflow_models::{GlobalRole, TeamId, TeamMemberRole};

use crate::middleware::auth::AuthUser;

/// Whether `actor` may hand out `target` as a global role.
///
/// Superadmins may grant anything; everyone else only roles strictly below
/// their own.
pub fn can_grant_global_role(actor: GlobalRole, target: GlobalRole) -> bool {
    actor == GlobalRole::Superadmin || actor.outranks(target)
}

/// Whether `actor` may modify or deactivate an account holding `target`.
pub fn can_manage_user(actor: GlobalRole, target: GlobalRole) -> bool {
    actor.is_platform_admin() && can_grant_global_role(actor, target)
}

pub fn can_create_teams(actor: GlobalRole) -> bool {
    matches!(
        actor,
        GlobalRole::Superadmin | GlobalRole::Admin | GlobalRole::TeamLeader
    )
}

pub fn ensure_can_grant(actor: &AuthUser, target: GlobalRole) -> Result<(), AppError> {
    if can_grant_global_role(actor.global_role(), target) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. Role {} may not grant role {}",
            actor.global_role().as_str(),
            target.as_str()
        )))
    }
}

pub fn ensure_can_manage_user(actor: &AuthUser, target: GlobalRole) -> Result<(), AppError> {
    if can_manage_user(actor.global_role(), target) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied. Role {} may not manage a {} account",
            actor.global_role().as_str(),
            target.as_str()
        )))
    }
}

/// Platform admins manage every team; otherwise the caller needs an active
/// leader membership in `team_id`.
pub async fn ensure_can_manage_members(
    teams: &dyn TeamRepository,
    actor: &AuthUser,
    team_id: TeamId,
) -> Result<(), AppError> {
    if actor.global_role().is_platform_admin() {
        return Ok(());
    }

    match teams.effective_role(actor.id(), team_id).await? {
        Some(TeamMemberRole::Leader) => Ok(()),
        _ => Err(AppError::forbidden(
            "Access denied. Team leader or administrator required",
        )),
    }
}
