//! Error types for the RHub system.
//!
//! Services raise these directly; the HTTP layer maps each variant to a
//! response status via [`RhubError::status_code`] without
//! reinterpretation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RhubError {
    /// Entity missing, or deliberately treated as missing so its
    /// existence is not revealed.
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Authenticated but not permitted for this action, field, or
    /// resource.
    #[error("{reason}")]
    Forbidden { reason: String },

    /// State invariant violation: duplicate active requisition, already
    /// approved, already deleted, wrong status, in-use master data.
    #[error("{message}")]
    Conflict { message: String },

    /// Malformed or referentially invalid payload fields.
    #[error("{message}")]
    InvalidInput { message: String },

    /// Missing or invalid credential, propagated unchanged from the
    /// authentication layer.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl RhubError {
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// HTTP status code the API layer responds with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Forbidden { .. } => 403,
            Self::Conflict { .. } => 409,
            Self::InvalidInput { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

pub type RhubResult<T> = Result<T, RhubError>;
