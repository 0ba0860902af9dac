//! Error types for Scout.

use thiserror::Error;
use uuid::Uuid;

/// Message returned for any uniqueness violation. The underlying
/// constraint name is never surfaced.
pub const DUPLICATE_RECORD_MESSAGE: &str =
    "A record with the same unique constraint already exists.";

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Query with ID {0} not found.")]
    QueryNotFound(Uuid),

    #[error("Insight with ID {0} not found.")]
    InsightNotFound(Uuid),

    #[error("Job with ID {0} not found.")]
    JobNotFound(Uuid),

    #[error("{}", DUPLICATE_RECORD_MESSAGE)]
    Conflict,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Synthesis unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

impl ScoutError {
    /// Whether this error means the referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScoutError::QueryNotFound(_) | ScoutError::InsightNotFound(_) | ScoutError::JobNotFound(_)
        )
    }
}

impl From<rusqlite::Error> for ScoutError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation
                    && matches!(
                        e.extended_code,
                        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                            | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    ) =>
            {
                ScoutError::Conflict
            }
            _ => ScoutError::DatabaseError(err),
        }
    }
}

/// Whether `err` is a foreign key violation, i.e. the referenced row is gone.
pub(crate) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}
