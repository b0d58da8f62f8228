//! The status transition table.
//!
//! Every legal (role, from, to) combination is listed explicitly;
//! anything absent from the table is rejected. Only the assigned HRBP
//! or assigned Recruiter may transition a requisition at all, which
//! the service checks before consulting this table.

use rhub_core::identity::RoleKind;
use rhub_core::models::requisition::RequisitionStatus;

use RequisitionStatus::{Closed, Completed, InProgress, OnHold, Open};
use RoleKind::{Hrbp, Recruiter};

/// The complete set of allowed transitions.
pub const TRANSITIONS: [(RoleKind, RequisitionStatus, RequisitionStatus); 7] = [
    (Hrbp, Open, OnHold),
    (Hrbp, OnHold, Open),
    (Hrbp, Completed, Closed),
    (Hrbp, Closed, Open),
    (Hrbp, Closed, OnHold),
    (Recruiter, Open, InProgress),
    (Recruiter, InProgress, Completed),
];

/// Whether `role` may move a requisition from `from` to `to`.
pub fn is_allowed(role: RoleKind, from: RequisitionStatus, to: RequisitionStatus) -> bool {
    TRANSITIONS.contains(&(role, from, to))
}
