//! Notification collaborator interface.
//!
//! Dispatch is fire-and-forget: callers log failures and never
//! propagate or retry them.

use thiserror::Error;

/// Notification templates raised by lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Requisition approved; the recruiter picks up the assignment.
    Assigned {
        recruiter_name: String,
        department: String,
        job_position: String,
    },
    /// Requisition reassigned to a different recruiter.
    Reassigned {
        recruiter_name: String,
        department: String,
        job_position: String,
    },
    /// Recruiter completed the process; the HRBP is informed.
    ProcessCompleted {
        hrbp_name: String,
        recruiter_name: String,
        job_position: String,
        job_code: String,
    },
    /// A job-description file was uploaded for the HRBP's requisition.
    JdUploaded {
        hrbp_name: String,
        job_position: String,
        job_code: String,
        uploaded_by: String,
    },
    /// Account created with a temporary password.
    Welcome {
        name: String,
        temporary_password: String,
    },
}

impl Notification {
    pub fn subject(&self) -> String {
        match self {
            Self::Assigned { job_position, .. } => {
                format!("New Requirement Assigned: {job_position}")
            }
            Self::Reassigned { job_position, .. } => {
                format!("Reassignment: New Requirement Assigned - {job_position}")
            }
            Self::ProcessCompleted {
                job_position,
                job_code,
                ..
            } => format!("Process Completed: {job_position} ({job_code})"),
            Self::JdUploaded {
                job_position,
                job_code,
                ..
            } => format!("Job Description Uploaded for {job_position} ({job_code})"),
            Self::Welcome { .. } => "Welcome to RHub! Your Account Details".to_string(),
        }
    }

    /// Plain-text body of the notification.
    pub fn body(&self) -> String {
        match self {
            Self::Assigned {
                recruiter_name,
                department,
                job_position,
            } => format!(
                "Hi {recruiter_name},\n\nA new requirement has been assigned to you: \
                 {job_position} in {department}.\n\nPlease log in to RHub to get started."
            ),
            Self::Reassigned {
                recruiter_name,
                department,
                job_position,
            } => format!(
                "Hi {recruiter_name},\n\nThe requirement {job_position} in {department} \
                 has been reassigned to you.\n\nPlease log in to RHub for details."
            ),
            Self::ProcessCompleted {
                hrbp_name,
                recruiter_name,
                job_position,
                job_code,
            } => format!(
                "Hi {hrbp_name},\n\n{recruiter_name} has completed the recruitment \
                 process for {job_position} ({job_code})."
            ),
            Self::JdUploaded {
                hrbp_name,
                job_position,
                job_code,
                uploaded_by,
            } => format!(
                "Hi {hrbp_name},\n\nA job description has been uploaded by {uploaded_by} \
                 for {job_position} ({job_code})."
            ),
            Self::Welcome {
                name,
                temporary_password,
            } => format!(
                "Hi {name},\n\nYour RHub account has been created.\n\n\
                 Temporary password: {temporary_password}\n\n\
                 Please change it after your first login."
            ),
        }
    }
}

#[derive(Debug, Error)]
#[error("notification delivery failed: {0}")]
pub struct NotifyError(pub String);

pub trait Notifier: Send + Sync {
    fn send(
        &self,
        to: &str,
        notification: Notification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
