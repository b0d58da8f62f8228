//! User account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::{Audit, Lifecycle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Generated external user code, e.g. "RHUB-042".
    pub user_code: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC-format hash; never the raw credential.
    pub password_hash: String,
    pub role_id: Uuid,
    pub department_id: Uuid,
    pub job_position_id: Uuid,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub lifecycle: Lifecycle,
    pub audit: Audit,
}

/// A user joined with the name of its role.
#[derive(Debug, Clone)]
pub struct UserWithRole {
    pub user: User,
    pub role_name: String,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub user_code: String,
    pub name: String,
    pub email: String,
    /// Raw temporary password; hashed with Argon2id before storage.
    pub password: String,
    pub role_id: Uuid,
    pub department_id: Uuid,
    pub job_position_id: Uuid,
    pub created_by: Option<String>,
}

/// Filters for user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Case-insensitive substring match on name or email.
    pub search: Option<String>,
    pub role_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
}
