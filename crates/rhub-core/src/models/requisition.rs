//! People Requisition — the central workflow entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::audit::{Audit, Lifecycle};

/// Status lifecycle of a requisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequisitionStatus {
    Open,
    InProgress,
    OnHold,
    Completed,
    Closed,
}

impl RequisitionStatus {
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::OnHold,
        Self::Completed,
        Self::Closed,
    ];

    /// Wire/storage form of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "inprogress",
            Self::OnHold => "onhold",
            Self::Completed => "completed",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "inprogress" => Some(Self::InProgress),
            "onhold" => Some(Self::OnHold),
            "completed" => Some(Self::Completed),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RequisitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statuses under which a requisition counts as "active" for the
/// one-active-requisition-per-triple rule.
pub const ACTIVE_STATUSES: [RequisitionStatus; 2] =
    [RequisitionStatus::Open, RequisitionStatus::InProgress];

/// Metadata of the attached job-description file. At most one JD file
/// is retained per requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdFile {
    /// Original filename as uploaded, returned on download.
    pub file_name: String,
    /// Stable path in the file store.
    pub stored_path: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requisition {
    pub id: Uuid,
    /// Generated code, e.g. "SSE001".
    pub job_code: String,
    pub job_position_id: Uuid,
    pub department_id: Uuid,
    pub recruiter_id: Uuid,
    pub hrbp_id: Uuid,
    pub nature_of_employment_id: Uuid,
    pub job_description: Option<String>,
    pub prf_number: Option<String>,
    pub prf_link: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
    pub status: RequisitionStatus,
    /// Set once by HRBP approval; never reverts.
    pub approved_by_hrbp: bool,
    pub jd_file: Option<JdFile>,
    pub lifecycle: Lifecycle,
    pub audit: Audit,
}

impl Requisition {
    /// Active means visible to duplicate checks: not deleted and still
    /// in a working status.
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active() && ACTIVE_STATUSES.contains(&self.status)
    }

    /// Whether the requester id is the assigned HRBP or recruiter.
    pub fn is_assigned(&self, user_id: Uuid) -> bool {
        self.hrbp_id == user_id || self.recruiter_id == user_id
    }
}

/// Repository-level creation record. The engine derives the job code
/// and attaches the creating HRBP before handing this over.
#[derive(Debug, Clone)]
pub struct NewRequisition {
    pub job_code: String,
    pub job_position_id: Uuid,
    pub department_id: Uuid,
    pub recruiter_id: Uuid,
    pub hrbp_id: Uuid,
    pub nature_of_employment_id: Uuid,
    pub job_description: Option<String>,
    pub prf_number: Option<String>,
    pub prf_link: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// Creation payload as submitted by the HRBP.
#[derive(Debug, Clone)]
pub struct CreateRequisition {
    pub job_position_id: Uuid,
    pub department_id: Uuid,
    pub recruiter_id: Uuid,
    pub nature_of_employment_id: Uuid,
    pub job_description: Option<String>,
    pub prf_number: Option<String>,
    pub prf_link: Option<String>,
    pub closing_date: Option<DateTime<Utc>>,
}

/// The editable fields of a requisition. Which subset a requester may
/// touch depends on their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionField {
    PrfNumber,
    PrfLink,
    Recruiter,
    Department,
    NatureOfEmployment,
    JobDescription,
}

impl RequisitionField {
    pub fn name(self) -> &'static str {
        match self {
            Self::PrfNumber => "PRF number",
            Self::PrfLink => "PRF link",
            Self::Recruiter => "recruiter",
            Self::Department => "department",
            Self::NatureOfEmployment => "nature of employment",
            Self::JobDescription => "job description",
        }
    }
}

impl fmt::Display for RequisitionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A partial edit; only present fields are applied. Field presence
/// alone triggers the role gate, even when the submitted value equals
/// the current one.
#[derive(Debug, Clone, Default)]
pub struct RequisitionEdit {
    pub prf_number: Option<String>,
    pub prf_link: Option<String>,
    pub recruiter_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub nature_of_employment_id: Option<Uuid>,
    pub job_description: Option<String>,
}

impl RequisitionEdit {
    /// Field keys present in this edit.
    pub fn submitted_fields(&self) -> Vec<RequisitionField> {
        let mut fields = Vec::new();
        if self.prf_number.is_some() {
            fields.push(RequisitionField::PrfNumber);
        }
        if self.prf_link.is_some() {
            fields.push(RequisitionField::PrfLink);
        }
        if self.recruiter_id.is_some() {
            fields.push(RequisitionField::Recruiter);
        }
        if self.department_id.is_some() {
            fields.push(RequisitionField::Department);
        }
        if self.nature_of_employment_id.is_some() {
            fields.push(RequisitionField::NatureOfEmployment);
        }
        if self.job_description.is_some() {
            fields.push(RequisitionField::JobDescription);
        }
        fields
    }
}

/// Relation-expanded view returned to callers: the requisition plus
/// the names behind its references.
#[derive(Debug, Clone)]
pub struct RequisitionDetails {
    pub requisition: Requisition,
    pub job_position: String,
    pub department: String,
    pub recruiter_name: String,
    pub recruiter_email: String,
    pub hrbp_name: String,
    pub hrbp_email: String,
}
