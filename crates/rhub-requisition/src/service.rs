//! Requisition service — lifecycle orchestration.

use chrono::Utc;
use rhub_core::error::{RhubError, RhubResult};
use rhub_core::identity::{Requester, RoleKind};
use rhub_core::models::audit::Lifecycle;
use rhub_core::models::lookup::LookupEntry;
use rhub_core::models::requisition::{
    CreateRequisition, JdFile, NewRequisition, Requisition, RequisitionDetails, RequisitionEdit,
    RequisitionStatus,
};
use rhub_core::models::user::UserWithRole;
use rhub_core::notify::{Notification, Notifier};
use rhub_core::repository::{
    LookupRepository, Page, PageRequest, PrefixCounterStore, RequisitionFilter,
    RequisitionRepository, RequisitionSort, UserRepository,
};
use rhub_core::storage::{FileStore, JdDownload, StoredUpload};
use tracing::{error, info};
use uuid::Uuid;

use crate::code;
use crate::fields;
use crate::storage::validate_upload;
use crate::transitions;
use crate::visibility::{Visibility, requisition_visibility};

/// People Requisition lifecycle engine.
///
/// Generic over repository and collaborator traits so the engine has
/// no dependency on the database or transport crates. The three
/// lookup repositories share a type; each is fixed to its own kind.
pub struct RequisitionService<R, U, L, P, N, F>
where
    R: RequisitionRepository,
    U: UserRepository,
    L: LookupRepository,
    P: PrefixCounterStore,
    N: Notifier,
    F: FileStore,
{
    requisitions: R,
    users: U,
    job_positions: L,
    departments: L,
    natures: L,
    counters: P,
    notifier: N,
    files: F,
}

impl<R, U, L, P, N, F> RequisitionService<R, U, L, P, N, F>
where
    R: RequisitionRepository,
    U: UserRepository,
    L: LookupRepository,
    P: PrefixCounterStore,
    N: Notifier,
    F: FileStore,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        requisitions: R,
        users: U,
        job_positions: L,
        departments: L,
        natures: L,
        counters: P,
        notifier: N,
        files: F,
    ) -> Self {
        Self {
            requisitions,
            users,
            job_positions,
            departments,
            natures,
            counters,
            notifier,
            files,
        }
    }

    /// Create a requisition. HRBP-only; the creator becomes the
    /// assigned HRBP.
    pub async fn create(
        &self,
        requester: &Requester,
        input: CreateRequisition,
    ) -> RhubResult<Requisition> {
        if requester.role != RoleKind::Hrbp {
            return Err(RhubError::forbidden(
                "Only an HRBP may create a requisition.",
            ));
        }

        // 1. At most one active requisition per (position, department,
        //    nature) triple.
        if self
            .requisitions
            .find_active_by_triple(
                input.job_position_id,
                input.department_id,
                input.nature_of_employment_id,
            )
            .await?
            .is_some()
        {
            return Err(RhubError::conflict(
                "An active requisition already exists for this job position, \
                 department, and nature of employment.",
            ));
        }

        // 2. Resolve all four references concurrently. Failures
        //    collapse into one generic error so valid ids cannot be
        //    enumerated.
        let (job_position, department, nature, recruiter) = tokio::join!(
            active_lookup(&self.job_positions, input.job_position_id),
            active_lookup(&self.departments, input.department_id),
            active_lookup(&self.natures, input.nature_of_employment_id),
            active_recruiter(&self.users, input.recruiter_id),
        );
        let job_position = job_position?;
        department?;
        nature?;
        recruiter?;

        // 3. Derive the job code from the position name and the
        //    per-prefix counter.
        let prefix = code::derive_prefix(&job_position.name);
        let count = self.counters.increment(&prefix).await?;
        let job_code = code::format_job_code(&prefix, count);

        let requisition = self
            .requisitions
            .create(NewRequisition {
                job_code,
                job_position_id: input.job_position_id,
                department_id: input.department_id,
                recruiter_id: input.recruiter_id,
                hrbp_id: requester.user_id,
                nature_of_employment_id: input.nature_of_employment_id,
                job_description: input.job_description,
                prf_number: input.prf_number,
                prf_link: input.prf_link,
                closing_date: input.closing_date,
                created_by: Some(requester.user_code.clone()),
            })
            .await?;

        info!(
            job_code = %requisition.job_code,
            hrbp = %requester.user_code,
            "Requisition created"
        );
        Ok(requisition)
    }

    /// Approve a requisition. HRBP-only; the flag is monotonic and a
    /// second approval is a conflict. The assigned recruiter is
    /// notified best-effort.
    pub async fn approve(&self, requester: &Requester, id: Uuid) -> RhubResult<RequisitionDetails> {
        if requester.role != RoleKind::Hrbp {
            return Err(RhubError::forbidden(
                "Only an HRBP may approve a requisition.",
            ));
        }

        let mut requisition = self.requisitions.get_by_id(id).await?;
        if !requisition.lifecycle.is_active() {
            return Err(RhubError::conflict("Requisition has been deleted."));
        }
        if requisition.hrbp_id != requester.user_id {
            return Err(RhubError::forbidden(
                "You are not assigned to this requisition.",
            ));
        }
        if requisition.approved_by_hrbp {
            return Err(RhubError::conflict("Requisition is already approved."));
        }

        requisition.approved_by_hrbp = true;
        requisition.audit.record_modified(&requester.user_code);
        self.requisitions.save(&requisition).await?;

        info!(job_code = %requisition.job_code, "Requisition approved");

        let details = self.expand(requisition).await?;
        self.dispatch(
            &details.recruiter_email.clone(),
            Notification::Assigned {
                recruiter_name: details.recruiter_name.clone(),
                department: details.department.clone(),
                job_position: details.job_position.clone(),
            },
        )
        .await;

        Ok(details)
    }

    /// Apply a partial field edit. The requester must be assigned, the
    /// status must permit editing, and every submitted field must be
    /// in the requester's editable set.
    pub async fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        edit: RequisitionEdit,
    ) -> RhubResult<RequisitionDetails> {
        let mut requisition = self.requisitions.get_by_id(id).await?;
        if !requisition.lifecycle.is_active() {
            return Err(RhubError::not_found("People Requisition"));
        }
        if !requisition.is_assigned(requester.user_id) {
            return Err(RhubError::forbidden(
                "You are not assigned to this requisition.",
            ));
        }
        if !matches!(
            requisition.status,
            RequisitionStatus::Open | RequisitionStatus::OnHold
        ) {
            return Err(RhubError::conflict(
                "Requisition cannot be edited in its current status.",
            ));
        }

        let submitted = edit.submitted_fields();
        if submitted.is_empty() {
            return Err(RhubError::invalid_input("No editable fields were submitted."));
        }

        // Field presence alone triggers the gate; an out-of-set field
        // is rejected even when the value matches the stored one.
        let allowed = fields::editable_fields(requester.role);
        for field in &submitted {
            if !allowed.contains(field) {
                return Err(RhubError::forbidden(format!(
                    "Field '{field}' is not editable by the {role} role.",
                    role = requester.role,
                )));
            }
        }

        // Referential edits are validated like creation references.
        if let Some(recruiter_id) = edit.recruiter_id {
            active_recruiter(&self.users, recruiter_id).await?;
        }
        if let Some(department_id) = edit.department_id {
            active_lookup(&self.departments, department_id).await?;
        }
        if let Some(nature_id) = edit.nature_of_employment_id {
            active_lookup(&self.natures, nature_id).await?;
        }

        let previous_recruiter = requisition.recruiter_id;
        if let Some(prf_number) = edit.prf_number {
            requisition.prf_number = Some(prf_number);
        }
        if let Some(prf_link) = edit.prf_link {
            requisition.prf_link = Some(prf_link);
        }
        if let Some(recruiter_id) = edit.recruiter_id {
            requisition.recruiter_id = recruiter_id;
        }
        if let Some(department_id) = edit.department_id {
            requisition.department_id = department_id;
        }
        if let Some(nature_id) = edit.nature_of_employment_id {
            requisition.nature_of_employment_id = nature_id;
        }
        if let Some(job_description) = edit.job_description {
            requisition.job_description = Some(job_description);
        }
        requisition.audit.record_modified(&requester.user_code);
        self.requisitions.save(&requisition).await?;

        let details = self.expand(requisition).await?;

        // Reassignment is detected by identity, not field equality.
        if details.requisition.recruiter_id != previous_recruiter {
            self.dispatch(
                &details.recruiter_email.clone(),
                Notification::Reassigned {
                    recruiter_name: details.recruiter_name.clone(),
                    department: details.department.clone(),
                    job_position: details.job_position.clone(),
                },
            )
            .await;
        }

        Ok(details)
    }

    /// Move a requisition through the status state machine. The
    /// transition must be listed for the requester's role.
    pub async fn update_status(
        &self,
        requester: &Requester,
        id: Uuid,
        to: RequisitionStatus,
    ) -> RhubResult<Requisition> {
        let mut requisition = self.requisitions.get_by_id(id).await?;
        if !requisition.lifecycle.is_active() {
            return Err(RhubError::not_found("People Requisition"));
        }
        if !requisition.is_assigned(requester.user_id) {
            return Err(RhubError::forbidden(
                "You are not assigned to this requisition.",
            ));
        }

        let from = requisition.status;
        if !transitions::is_allowed(requester.role, from, to) {
            return Err(RhubError::invalid_input(format!(
                "Status transition from {from} to {to} is not allowed for the \
                 {role} role.",
                role = requester.role,
            )));
        }

        requisition.status = to;
        requisition.audit.record_modified(&requester.user_code);
        self.requisitions.save(&requisition).await?;

        info!(
            job_code = %requisition.job_code,
            from = %from,
            to = %to,
            "Requisition status changed"
        );

        if requester.role == RoleKind::Recruiter && to == RequisitionStatus::Completed {
            let details = self.expand(requisition.clone()).await?;
            self.dispatch(
                &details.hrbp_email,
                Notification::ProcessCompleted {
                    hrbp_name: details.hrbp_name.clone(),
                    recruiter_name: details.recruiter_name.clone(),
                    job_position: details.job_position.clone(),
                    job_code: details.requisition.job_code.clone(),
                },
            )
            .await;
        }

        Ok(requisition)
    }

    /// Soft-delete a requisition. HRBP-only and only while `open`; the
    /// row stays queryable for audit.
    pub async fn delete(&self, requester: &Requester, id: Uuid) -> RhubResult<()> {
        if requester.role != RoleKind::Hrbp {
            return Err(RhubError::forbidden(
                "Only an HRBP may delete a requisition.",
            ));
        }

        let mut requisition = self.requisitions.get_by_id(id).await?;
        if !requisition.lifecycle.is_active() {
            return Err(RhubError::conflict("Requisition is already deleted."));
        }
        if requisition.hrbp_id != requester.user_id {
            return Err(RhubError::forbidden(
                "You are not assigned to this requisition.",
            ));
        }
        if requisition.status != RequisitionStatus::Open {
            return Err(RhubError::conflict(
                "Only open requisitions can be deleted.",
            ));
        }

        requisition.lifecycle = Lifecycle::Deleted;
        requisition.audit.record_deleted(&requester.user_code);
        self.requisitions.save(&requisition).await?;

        info!(job_code = %requisition.job_code, "Requisition deleted");
        Ok(())
    }

    /// Fetch one requisition, relation-expanded, applying the
    /// visibility policy before any data is returned.
    pub async fn get_by_id(
        &self,
        requester: &Requester,
        id: Uuid,
    ) -> RhubResult<RequisitionDetails> {
        let requisition = self.requisitions.get_by_id(id).await?;
        self.check_visibility(requester, &requisition)?;
        self.expand(requisition).await
    }

    /// List requisitions. Recruiters are implicitly scoped to approved
    /// requisitions assigned to them; HRBPs see every non-deleted row.
    pub async fn get_all(
        &self,
        requester: &Requester,
        mut filter: RequisitionFilter,
        sort: RequisitionSort,
        page: PageRequest,
    ) -> RhubResult<Page<Requisition>> {
        match requester.role {
            RoleKind::Hrbp => {}
            RoleKind::Recruiter => {
                filter.recruiter_id = Some(requester.user_id);
                filter.approved_only = true;
            }
            RoleKind::Admin => {
                return Err(RhubError::forbidden(
                    "Your role may not list requisitions.",
                ));
            }
        }
        self.requisitions.list(&filter, sort, page).await
    }

    /// Attach a JD file already written to the store. Recruiter-only;
    /// any rejection removes the stored artifact so nothing orphans.
    /// Replacing an existing file deletes the previous artifact
    /// best-effort.
    pub async fn upload_jd(
        &self,
        requester: &Requester,
        id: Uuid,
        upload: StoredUpload,
    ) -> RhubResult<RequisitionDetails> {
        if let Err(e) = validate_upload(&upload) {
            return Err(self.reject_upload(&upload, e).await);
        }
        if requester.role != RoleKind::Recruiter {
            return Err(self
                .reject_upload(
                    &upload,
                    RhubError::forbidden("Only the assigned recruiter may upload a job description."),
                )
                .await);
        }

        let mut requisition = match self.requisitions.get_by_id(id).await {
            Ok(r) => r,
            Err(e) => return Err(self.reject_upload(&upload, e).await),
        };
        if let Err(e) = self.check_visibility(requester, &requisition) {
            return Err(self.reject_upload(&upload, e).await);
        }

        // At most one JD file per requisition; drop the old artifact.
        if let Some(previous) = requisition.jd_file.take() {
            self.discard_file(&previous.stored_path).await;
        }

        requisition.jd_file = Some(JdFile {
            file_name: upload.original_name,
            stored_path: upload.stored_path,
            uploaded_at: Utc::now(),
        });
        requisition.audit.record_modified(&requester.user_code);
        self.requisitions.save(&requisition).await?;

        info!(job_code = %requisition.job_code, "Job description uploaded");

        let details = self.expand(requisition).await?;
        self.dispatch(
            &details.hrbp_email.clone(),
            Notification::JdUploaded {
                hrbp_name: details.hrbp_name.clone(),
                job_position: details.job_position.clone(),
                job_code: details.requisition.job_code.clone(),
                uploaded_by: requester.name.clone(),
            },
        )
        .await;

        Ok(details)
    }

    /// Resolve the stored JD artifact for delivery.
    pub async fn download_jd(&self, requester: &Requester, id: Uuid) -> RhubResult<JdDownload> {
        let requisition = self.requisitions.get_by_id(id).await?;
        self.check_visibility(requester, &requisition)?;

        let jd = requisition
            .jd_file
            .ok_or_else(|| RhubError::not_found("Job description file"))?;

        Ok(JdDownload {
            stored_path: jd.stored_path,
            file_name: jd.file_name,
        })
    }

    fn check_visibility(
        &self,
        requester: &Requester,
        requisition: &Requisition,
    ) -> RhubResult<()> {
        match requisition_visibility(requester, requisition) {
            Visibility::Visible => Ok(()),
            Visibility::HiddenAsNotFound => Err(RhubError::not_found("People Requisition")),
            Visibility::Forbidden => Err(RhubError::forbidden(
                "You are not assigned to this requisition.",
            )),
        }
    }

    /// Assemble the relation-expanded view from independent point
    /// lookups, issued concurrently.
    async fn expand(&self, requisition: Requisition) -> RhubResult<RequisitionDetails> {
        let (job_position, department, recruiter, hrbp) = tokio::join!(
            self.job_positions.get_by_id(requisition.job_position_id),
            self.departments.get_by_id(requisition.department_id),
            self.users.get_by_id(requisition.recruiter_id),
            self.users.get_by_id(requisition.hrbp_id),
        );
        let (job_position, department, recruiter, hrbp) =
            (job_position?, department?, recruiter?, hrbp?);

        Ok(RequisitionDetails {
            requisition,
            job_position: job_position.name,
            department: department.name,
            recruiter_name: recruiter.name,
            recruiter_email: recruiter.email,
            hrbp_name: hrbp.name,
            hrbp_email: hrbp.email,
        })
    }

    /// Best-effort dispatch: failures are logged and swallowed, never
    /// propagated or retried.
    async fn dispatch(&self, to: &str, notification: Notification) {
        if let Err(e) = self.notifier.send(to, notification).await {
            error!(error = %e, to, "Notification dispatch failed");
        }
    }

    /// Best-effort artifact removal.
    async fn discard_file(&self, stored_path: &str) {
        if let Err(e) = self.files.delete(stored_path).await {
            error!(error = %e, stored_path, "Stored file cleanup failed");
        }
    }

    /// Remove the already-stored upload on a rejected request, then
    /// hand the rejection back.
    async fn reject_upload(&self, upload: &StoredUpload, err: RhubError) -> RhubError {
        self.discard_file(&upload.stored_path).await;
        err
    }
}

fn invalid_references() -> RhubError {
    RhubError::invalid_input("One or more referenced fields are invalid.")
}

/// A lookup reference is valid only when it exists and is not deleted.
/// Missing or deleted references collapse into the generic error;
/// infrastructure failures propagate untouched.
async fn active_lookup<L: LookupRepository>(repo: &L, id: Uuid) -> RhubResult<LookupEntry> {
    match repo.get_by_id(id).await {
        Ok(entry) if entry.lifecycle.is_active() => Ok(entry),
        Ok(_) => Err(invalid_references()),
        Err(RhubError::NotFound { .. }) => Err(invalid_references()),
        Err(e) => Err(e),
    }
}

/// A recruiter reference must exist, be active, and carry the
/// Recruiter role.
async fn active_recruiter<U: UserRepository>(repo: &U, id: Uuid) -> RhubResult<UserWithRole> {
    match repo.get_with_role(id).await {
        Ok(found)
            if found.user.lifecycle.is_active()
                && RoleKind::parse(&found.role_name) == Some(RoleKind::Recruiter) =>
        {
            Ok(found)
        }
        Ok(_) => Err(invalid_references()),
        Err(RhubError::NotFound { .. }) => Err(invalid_references()),
        Err(e) => Err(e),
    }
}
