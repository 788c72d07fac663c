//! # CatalogFlow Core
//!
//! Core types shared by every CatalogFlow crate:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use catalogflow_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! if !verify_password("secure_password", &hash)? {
//!     return Err(AppError::invalid_credentials());
//! }
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{PasswordHash, hash_password, verify_dummy_password, verify_password};
