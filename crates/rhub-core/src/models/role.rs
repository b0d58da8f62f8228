//! Role domain model.
//!
//! Roles are seeded ("Admin", "HRBP", "Recruiter") and referenced by
//! users; see [`crate::identity::RoleKind`] for the parsed form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::{Audit, Lifecycle};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub lifecycle: Lifecycle,
    pub audit: Audit,
}
