//! Salted password hashing and verification using bcrypt.
//!
//! Hashes are wrapped in [`PasswordHash`], which has no `Serialize` impl and a
//! redacted `Debug`, so a hash cannot end up in a response body or a log line
//! by accident.

use std::fmt;
use std::sync::LazyLock;

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

/// A bcrypt hash as stored in `auth.users.password_hash`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash loaded from the store.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

// Verified against when the account does not exist, so the unknown-email path
// costs the same bcrypt work as the wrong-password path.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash("catalogflow-timing-equalizer", DEFAULT_COST).unwrap_or_default());

pub fn hash_password(password: &str) -> Result<PasswordHash, AppError> {
    hash(password, DEFAULT_COST)
        .map(PasswordHash)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against `hash`. bcrypt compares digests in constant time.
pub fn verify_password(password: &str, hash: &PasswordHash) -> Result<bool, AppError> {
    verify(password, hash.as_str())
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Burns one bcrypt verification and always reports a mismatch.
pub fn verify_dummy_password(password: &str) -> bool {
    let _ = verify(password, DUMMY_HASH.as_str());
    false
}
