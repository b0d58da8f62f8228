//! Retrieval visibility policy.
//!
//! One function decides, before any data is returned, whether a
//! requester sees a requisition, is told it does not exist, or is
//! refused outright. Hiding as not-found keeps an unapproved
//! requisition's existence from leaking to recruiters.

use rhub_core::identity::{Requester, RoleKind};
use rhub_core::models::requisition::Requisition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    /// Respond with 404 so the resource's existence is not revealed.
    HiddenAsNotFound,
    Forbidden,
}

/// Whether `requester` may view `requisition`.
///
/// Deleted requisitions are always hidden. Recruiters never see an
/// unapproved requisition, assigned or not, and learn nothing from
/// the response. Anyone else must be the assigned HRBP or Recruiter.
pub fn requisition_visibility(requester: &Requester, requisition: &Requisition) -> Visibility {
    if !requisition.lifecycle.is_active() {
        return Visibility::HiddenAsNotFound;
    }
    if requester.role == RoleKind::Recruiter && !requisition.approved_by_hrbp {
        return Visibility::HiddenAsNotFound;
    }
    if !requisition.is_assigned(requester.user_id) {
        return Visibility::Forbidden;
    }
    Visibility::Visible
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rhub_core::models::audit::{Audit, Lifecycle};
    use rhub_core::models::requisition::RequisitionStatus;
    use uuid::Uuid;

    use super::*;

    fn requester(role: RoleKind, user_id: Uuid) -> Requester {
        Requester {
            user_id,
            user_code: "RHUB-001".into(),
            role,
            name: "Test User".into(),
            email: "test@example.com".into(),
        }
    }

    fn requisition(recruiter_id: Uuid, hrbp_id: Uuid, approved: bool) -> Requisition {
        Requisition {
            id: Uuid::new_v4(),
            job_code: "SSE001".into(),
            job_position_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            recruiter_id,
            hrbp_id,
            nature_of_employment_id: Uuid::new_v4(),
            job_description: None,
            prf_number: None,
            prf_link: None,
            closing_date: Some(Utc::now()),
            status: RequisitionStatus::Open,
            approved_by_hrbp: approved,
            jd_file: None,
            lifecycle: Lifecycle::Active,
            audit: Audit::created(None),
        }
    }

    #[test]
    fn assigned_hrbp_sees_unapproved() {
        let hrbp_id = Uuid::new_v4();
        let req = requisition(Uuid::new_v4(), hrbp_id, false);
        assert_eq!(
            requisition_visibility(&requester(RoleKind::Hrbp, hrbp_id), &req),
            Visibility::Visible
        );
    }

    #[test]
    fn recruiter_never_sees_unapproved() {
        let recruiter_id = Uuid::new_v4();
        let req = requisition(recruiter_id, Uuid::new_v4(), false);
        // Even the assigned recruiter gets not-found before approval.
        assert_eq!(
            requisition_visibility(&requester(RoleKind::Recruiter, recruiter_id), &req),
            Visibility::HiddenAsNotFound
        );
    }

    #[test]
    fn unassigned_user_is_forbidden() {
        let req = requisition(Uuid::new_v4(), Uuid::new_v4(), true);
        assert_eq!(
            requisition_visibility(&requester(RoleKind::Hrbp, Uuid::new_v4()), &req),
            Visibility::Forbidden
        );
    }

    #[test]
    fn deleted_is_hidden_before_any_other_check() {
        let hrbp_id = Uuid::new_v4();
        let mut req = requisition(Uuid::new_v4(), hrbp_id, true);
        req.lifecycle = Lifecycle::Deleted;
        assert_eq!(
            requisition_visibility(&requester(RoleKind::Hrbp, hrbp_id), &req),
            Visibility::HiddenAsNotFound
        );
    }
}
