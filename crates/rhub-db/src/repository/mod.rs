//! SurrealDB repository implementations.

mod counter;
mod lookup;
mod requisition;
mod role;
mod user;

pub use counter::SurrealPrefixCounter;
pub use lookup::SurrealLookupRepository;
pub use requisition::SurrealRequisitionRepository;
pub use role::SurrealRoleRepository;
pub use user::{SurrealUserRepository, verify_password};

use rhub_core::models::audit::Lifecycle;

use crate::error::DbError;

pub(crate) fn lifecycle_str(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Active => "Active",
        Lifecycle::Deleted => "Deleted",
    }
}

pub(crate) fn parse_lifecycle(s: &str) -> Result<Lifecycle, DbError> {
    match s {
        "Active" => Ok(Lifecycle::Active),
        "Deleted" => Ok(Lifecycle::Deleted),
        other => Err(DbError::Internal(format!("unknown lifecycle: {other}"))),
    }
}
