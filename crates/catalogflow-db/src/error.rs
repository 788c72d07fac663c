//! Store-level error type and its translation into [`AppError`].

use anyhow::anyhow;
use catalogflow_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store call timed out")]
    Timeout,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("missing reference: {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(err, sqlx::Error::PoolTimedOut) {
            return StoreError::Timeout;
        }

        let violation = err.as_database_error().and_then(|db_err| {
            let constraint = db_err.constraint().map(str::to_string);
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => Some(StoreError::Conflict(
                    constraint.unwrap_or_else(|| "unique constraint".into()),
                )),
                Some(FOREIGN_KEY_VIOLATION) => Some(StoreError::MissingReference(
                    constraint.unwrap_or_else(|| "foreign key constraint".into()),
                )),
                _ => None,
            }
        });

        match violation {
            Some(mapped) => mapped,
            None => StoreError::Database(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => AppError::timeout(anyhow!("store call timed out")),
            StoreError::Conflict(what) => AppError::conflict(anyhow!("Conflict on {}", what)),
            StoreError::MissingReference(what) => {
                AppError::not_found(anyhow!("Referenced record not found ({})", what))
            }
            StoreError::Database(e) => AppError::database(anyhow::Error::new(e)),
        }
    }
}
