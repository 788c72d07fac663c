//! Request extractors and the authorization policy.
//!
//! - [`auth`]: `AuthUser` and role-gated extractors
//! - [`role`]: Decisions combining global and team roles
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <access token>`
//! 2. `AuthUser` verifies the token (signature, expiry, kind)
//! 3. The subject is loaded and must still be active
//! 4. Role extractors or policy helpers decide, then the handler runs
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequirePlatformAdmin;
//!
//! async fn deactivate_user(
//!     RequirePlatformAdmin(actor): RequirePlatformAdmin,
//! ) -> impl IntoResponse {
//!     // Only superadmins and admins get here
//! }
//! ```

pub mod auth;
pub mod role;
