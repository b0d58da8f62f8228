//! Database-specific error types and conversions.

use rhub_core::error::RhubError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl From<DbError> for RhubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, .. } => RhubError::NotFound { entity },
            other => RhubError::Database(other.to_string()),
        }
    }
}
