//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; every service is generic over these traits so the
//! service layer carries no database dependency.

use uuid::Uuid;

use crate::error::RhubResult;
use crate::models::{
    lookup::{CreateLookupEntry, LookupEntry, LookupKind},
    requisition::{NewRequisition, Requisition, RequisitionStatus},
    role::Role,
    user::{CreateUser, User, UserFilter, UserWithRole},
};

/// 1-based page/limit pagination parameters.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1) * self.limit
    }
}

/// A page of results plus the total matching count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sortable requisition columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequisitionSortField {
    CreatedAt,
    ClosingDate,
    JobCode,
    Status,
}

#[derive(Debug, Clone, Copy)]
pub struct RequisitionSort {
    pub field: RequisitionSortField,
    pub order: SortOrder,
}

impl Default for RequisitionSort {
    fn default() -> Self {
        Self {
            field: RequisitionSortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// Filters for requisition listing. Deleted rows are always excluded.
#[derive(Debug, Clone, Default)]
pub struct RequisitionFilter {
    pub status: Option<RequisitionStatus>,
    pub department_id: Option<Uuid>,
    /// Restrict to requisitions assigned to this recruiter.
    pub recruiter_id: Option<Uuid>,
    /// Restrict to HRBP-approved requisitions.
    pub approved_only: bool,
    /// Case-insensitive substring match on the job code.
    pub code_search: Option<String>,
}

// ---------------------------------------------------------------------------
// Master data
// ---------------------------------------------------------------------------

/// One repository per [`LookupKind`]; the trait is shared because the
/// three lookup tables have the same shape.
pub trait LookupRepository: Send + Sync {
    fn kind(&self) -> LookupKind;

    fn create(
        &self,
        input: CreateLookupEntry,
    ) -> impl Future<Output = RhubResult<LookupEntry>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RhubResult<LookupEntry>> + Send;

    /// Find a non-deleted entry with exactly this name.
    fn find_active_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = RhubResult<Option<LookupEntry>>> + Send;

    /// Persist the current state of a loaded entry.
    fn save(&self, entry: &LookupEntry) -> impl Future<Output = RhubResult<()>> + Send;

    fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> impl Future<Output = RhubResult<Page<LookupEntry>>> + Send;

    /// True when a non-deleted requisition or user still references
    /// this entry; such entries must not be edited or removed.
    fn in_active_use(&self, id: Uuid) -> impl Future<Output = RhubResult<bool>> + Send;
}

pub trait RoleRepository: Send + Sync {
    /// Create a role row. Used by seeding and test fixtures.
    fn create(&self, name: &str) -> impl Future<Output = RhubResult<Role>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RhubResult<Role>> + Send;

    fn get_by_name(&self, name: &str) -> impl Future<Output = RhubResult<Role>> + Send;

    fn list(&self) -> impl Future<Output = RhubResult<Vec<Role>>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Create a user; the raw password is hashed before storage.
    fn create(&self, input: CreateUser) -> impl Future<Output = RhubResult<User>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RhubResult<User>> + Send;

    /// The user joined with its role name.
    fn get_with_role(&self, id: Uuid) -> impl Future<Output = RhubResult<UserWithRole>> + Send;

    /// Find a non-deleted user with this email.
    fn find_active_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = RhubResult<Option<User>>> + Send;

    /// Persist the current state of a loaded user. Does not touch the
    /// password hash.
    fn save(&self, user: &User) -> impl Future<Output = RhubResult<()>> + Send;

    /// Hash and store a new password for the user.
    fn set_password(
        &self,
        id: Uuid,
        raw_password: &str,
    ) -> impl Future<Output = RhubResult<()>> + Send;

    fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> impl Future<Output = RhubResult<Page<User>>> + Send;

    /// True when the user is assigned, as recruiter or HRBP, to a
    /// non-deleted requisition that has not completed.
    fn has_active_requisition(&self, user_id: Uuid)
    -> impl Future<Output = RhubResult<bool>> + Send;
}

// ---------------------------------------------------------------------------
// Requisitions
// ---------------------------------------------------------------------------

pub trait RequisitionRepository: Send + Sync {
    fn create(&self, input: NewRequisition)
    -> impl Future<Output = RhubResult<Requisition>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RhubResult<Requisition>> + Send;

    /// The at-most-one active requisition for a (job position,
    /// department, nature of employment) triple.
    fn find_active_by_triple(
        &self,
        job_position_id: Uuid,
        department_id: Uuid,
        nature_of_employment_id: Uuid,
    ) -> impl Future<Output = RhubResult<Option<Requisition>>> + Send;

    /// Persist the current state of a loaded requisition.
    fn save(&self, requisition: &Requisition) -> impl Future<Output = RhubResult<()>> + Send;

    fn list(
        &self,
        filter: &RequisitionFilter,
        sort: RequisitionSort,
        page: PageRequest,
    ) -> impl Future<Output = RhubResult<Page<Requisition>>> + Send;
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

pub trait PrefixCounterStore: Send + Sync {
    /// Atomically increment the counter for `prefix`, creating it at 1
    /// when absent, and return the new value. This is the only
    /// operation in the system requiring true storage-level atomicity.
    fn increment(&self, prefix: &str) -> impl Future<Output = RhubResult<u64>> + Send;
}
