//! Lifecycle tag and audit trail shared by every entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical lifecycle of a row. Rows are never physically removed; a
/// `Deleted` row stays queryable for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Active,
    Deleted,
}

impl Lifecycle {
    /// The single "is usable" predicate consulted by every existence,
    /// duplicate, and in-use check.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Who created/modified/deleted a row, and when. Actors are recorded as
/// external user codes, not internal ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audit {
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_by: Option<String>,
    pub modified_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Audit {
    pub fn created(by: Option<String>) -> Self {
        Self {
            created_by: by,
            created_at: Utc::now(),
            modified_by: None,
            modified_at: None,
            deleted_by: None,
            deleted_at: None,
        }
    }

    pub fn record_modified(&mut self, by: &str) {
        self.modified_by = Some(by.to_owned());
        self.modified_at = Some(Utc::now());
    }

    pub fn record_deleted(&mut self, by: &str) {
        self.deleted_by = Some(by.to_owned());
        self.deleted_at = Some(Utc::now());
    }
}
