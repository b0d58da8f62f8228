//! Editable field sets per role.
//!
//! Which requisition fields an actor may edit is an explicit mapping
//! from role to an immutable field list, checked on field presence
//! before any mutation is applied. A submitted field outside the set
//! is rejected even when its value equals the stored one.

use rhub_core::identity::RoleKind;
use rhub_core::models::requisition::RequisitionField;

/// Fields the assigned HRBP may edit.
pub const HRBP_EDITABLE: [RequisitionField; 6] = [
    RequisitionField::PrfNumber,
    RequisitionField::PrfLink,
    RequisitionField::Recruiter,
    RequisitionField::Department,
    RequisitionField::NatureOfEmployment,
    RequisitionField::JobDescription,
];

/// Fields the assigned Recruiter may edit. Recruiters cannot reassign
/// the requisition to another recruiter.
pub const RECRUITER_EDITABLE: [RequisitionField; 5] = [
    RequisitionField::PrfNumber,
    RequisitionField::PrfLink,
    RequisitionField::Department,
    RequisitionField::NatureOfEmployment,
    RequisitionField::JobDescription,
];

/// The editable field set for a role. Roles outside the workflow get
/// an empty set.
pub fn editable_fields(role: RoleKind) -> &'static [RequisitionField] {
    match role {
        RoleKind::Hrbp => &HRBP_EDITABLE,
        RoleKind::Recruiter => &RECRUITER_EDITABLE,
        RoleKind::Admin => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recruiters_cannot_reassign() {
        assert!(!editable_fields(RoleKind::Recruiter).contains(&RequisitionField::Recruiter));
        assert!(editable_fields(RoleKind::Hrbp).contains(&RequisitionField::Recruiter));
    }

    #[test]
    fn admins_edit_nothing() {
        assert!(editable_fields(RoleKind::Admin).is_empty());
    }
}
