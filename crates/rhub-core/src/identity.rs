//! Authenticated requester identity.
//!
//! Produced by the authentication layer. The workflow engine trusts
//! this identity and performs no credential checks of its own.

use std::fmt;

use uuid::Uuid;

/// Role names recognized by the workflow engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Admin,
    Hrbp,
    Recruiter,
}

impl RoleKind {
    /// Parse a stored role name. Role rows are seeded with exactly
    /// these names.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Admin" => Some(Self::Admin),
            "HRBP" => Some(Self::Hrbp),
            "Recruiter" => Some(Self::Recruiter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Hrbp => "HRBP",
            Self::Recruiter => "Recruiter",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user on whose behalf a request runs.
#[derive(Debug, Clone)]
pub struct Requester {
    /// Internal user id, compared against requisition assignments.
    pub user_id: Uuid,
    /// External user code (e.g. "RHUB-042") recorded in audit fields.
    pub user_code: String,
    pub role: RoleKind,
    pub name: String,
    pub email: String,
}
