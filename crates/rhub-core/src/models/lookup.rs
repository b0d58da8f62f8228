//! Master lookup entries: departments, job positions, and natures of
//! employment.
//!
//! The three lookup tables share one shape (a named, soft-deletable,
//! audited row); each kind maps to its own database table.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::{Audit, Lifecycle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupKind {
    Department,
    JobPosition,
    NatureOfEmployment,
}

impl LookupKind {
    /// Database table backing this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::JobPosition => "job_position",
            Self::NatureOfEmployment => "nature_of_employment",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Department => "Department",
            Self::JobPosition => "Job position",
            Self::NatureOfEmployment => "Nature of employment",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: Uuid,
    pub kind: LookupKind,
    pub name: String,
    pub lifecycle: Lifecycle,
    pub audit: Audit,
}

#[derive(Debug, Clone)]
pub struct CreateLookupEntry {
    pub name: String,
    pub created_by: Option<String>,
}
