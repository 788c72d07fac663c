//! PostgreSQL repositories over the `auth` schema.
//!
//! Queries are built at runtime (`query_as::<_, T>`), so the workspace
//! compiles without a reachable database.

mod teams;
mod users;

pub use teams::PgTeamRepository;
pub use users::PgUserRepository;
