//! User provisioning service.
//!
//! Accounts are created by an Admin with a generated external user
//! code and a temporary password delivered by the welcome
//! notification. Users assigned to active requisitions cannot be
//! edited or removed.

use rhub_core::error::{RhubError, RhubResult};
use rhub_core::identity::{Requester, RoleKind};
use rhub_core::models::audit::Lifecycle;
use rhub_core::models::lookup::LookupEntry;
use rhub_core::models::user::{CreateUser, User, UserFilter, UserWithRole};
use rhub_core::notify::{Notification, Notifier};
use rhub_core::repository::{
    LookupRepository, Page, PageRequest, PrefixCounterStore, RoleRepository, UserRepository,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::password;

/// Counter prefix for generated user codes.
const USER_CODE_PREFIX: &str = "RHUB";

/// Provisioning payload; the user code and temporary password are
/// generated, never submitted.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role_id: Uuid,
    pub department_id: Uuid,
    pub job_position_id: Uuid,
}

/// Partial account edit; only present fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UserEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub job_position_id: Option<Uuid>,
}

pub struct UserService<U, R, L, P, N>
where
    U: UserRepository,
    R: RoleRepository,
    L: LookupRepository,
    P: PrefixCounterStore,
    N: Notifier,
{
    users: U,
    roles: R,
    departments: L,
    job_positions: L,
    counters: P,
    notifier: N,
}

impl<U, R, L, P, N> UserService<U, R, L, P, N>
where
    U: UserRepository,
    R: RoleRepository,
    L: LookupRepository,
    P: PrefixCounterStore,
    N: Notifier,
{
    pub fn new(
        users: U,
        roles: R,
        departments: L,
        job_positions: L,
        counters: P,
        notifier: N,
    ) -> Self {
        Self {
            users,
            roles,
            departments,
            job_positions,
            counters,
            notifier,
        }
    }

    /// Provision an account: normalized unique email, validated
    /// references, generated user code and temporary password, welcome
    /// notification (best-effort).
    pub async fn create_user(
        &self,
        requester: &Requester,
        input: CreateUserRequest,
    ) -> RhubResult<User> {
        require_admin(requester)?;

        let email = input.email.trim().to_lowercase();
        if !email_shape_ok(&email) {
            return Err(RhubError::invalid_input("Invalid email address."));
        }
        if self.users.find_active_by_email(&email).await?.is_some() {
            return Err(RhubError::conflict("A user with this email already exists."));
        }

        self.validate_references(
            Some(input.role_id),
            Some(input.department_id),
            Some(input.job_position_id),
        )
        .await?;

        let count = self.counters.increment(USER_CODE_PREFIX).await?;
        let user_code = format!("{USER_CODE_PREFIX}-{count:03}");
        let temporary_password = password::generate_temporary();

        let user = self
            .users
            .create(CreateUser {
                user_code,
                name: input.name.trim().to_string(),
                email,
                password: temporary_password.clone(),
                role_id: input.role_id,
                department_id: input.department_id,
                job_position_id: input.job_position_id,
                created_by: Some(requester.user_code.clone()),
            })
            .await?;

        info!(user_code = %user.user_code, "User provisioned");

        if let Err(e) = self
            .notifier
            .send(
                &user.email,
                Notification::Welcome {
                    name: user.name.clone(),
                    temporary_password,
                },
            )
            .await
        {
            error!(error = %e, to = %user.email, "Welcome notification failed");
        }

        Ok(user)
    }

    /// Change the requester's own password after verifying the current
    /// credential and the complexity policy.
    pub async fn change_password(
        &self,
        requester: &Requester,
        current_password: &str,
        new_password: &str,
    ) -> RhubResult<()> {
        if !password::is_complex(new_password) {
            return Err(RhubError::invalid_input(
                "Password must be at least 8 characters and include upper and \
                 lower case letters, a digit, and a special character.",
            ));
        }

        let user = self.users.get_by_id(requester.user_id).await?;
        if !password::verify(current_password, &user.password_hash)? {
            return Err(RhubError::unauthorized("current password is incorrect"));
        }

        self.users
            .set_password(requester.user_id, new_password)
            .await
    }

    /// Fetch one account with its role name. A Recruiter may view
    /// another Recruiter's profile only when it is their own.
    pub async fn get_user(&self, requester: &Requester, id: Uuid) -> RhubResult<UserWithRole> {
        let found = self.users.get_with_role(id).await?;
        if !found.user.lifecycle.is_active() {
            return Err(RhubError::not_found("User"));
        }

        if requester.role == RoleKind::Recruiter
            && RoleKind::parse(&found.role_name) == Some(RoleKind::Recruiter)
            && found.user.id != requester.user_id
        {
            return Err(RhubError::forbidden(
                "Recruiters may only view their own profile.",
            ));
        }

        Ok(found)
    }

    /// Paginated, filtered list of active accounts.
    pub async fn get_all(&self, filter: &UserFilter, page: PageRequest) -> RhubResult<Page<User>> {
        self.users.list(filter, page).await
    }

    /// Apply a partial account edit. Refused while the user is
    /// assigned to an active requisition.
    pub async fn edit_user(
        &self,
        requester: &Requester,
        id: Uuid,
        edit: UserEdit,
    ) -> RhubResult<User> {
        require_admin(requester)?;

        let mut user = self.users.get_by_id(id).await?;
        if !user.lifecycle.is_active() {
            return Err(RhubError::not_found("User"));
        }
        if self.users.has_active_requisition(id).await? {
            return Err(RhubError::conflict(
                "Cannot edit user. They are assigned to active People Requisitions.",
            ));
        }

        if let Some(email) = &edit.email {
            let email = email.trim().to_lowercase();
            if !email_shape_ok(&email) {
                return Err(RhubError::invalid_input("Invalid email address."));
            }
            if let Some(other) = self.users.find_active_by_email(&email).await? {
                if other.id != id {
                    return Err(RhubError::conflict(
                        "A user with this email already exists.",
                    ));
                }
            }
            user.email = email;
        }

        self.validate_references(edit.role_id, edit.department_id, edit.job_position_id)
            .await?;

        if let Some(name) = edit.name {
            user.name = name.trim().to_string();
        }
        if let Some(role_id) = edit.role_id {
            user.role_id = role_id;
        }
        if let Some(department_id) = edit.department_id {
            user.department_id = department_id;
        }
        if let Some(job_position_id) = edit.job_position_id {
            user.job_position_id = job_position_id;
        }
        user.audit.record_modified(&requester.user_code);
        self.users.save(&user).await?;

        Ok(user)
    }

    /// Soft-delete an account. Self-deletion and deleting a user on
    /// active requisitions are refused.
    pub async fn remove_user(&self, requester: &Requester, id: Uuid) -> RhubResult<()> {
        require_admin(requester)?;

        if requester.user_id == id {
            return Err(RhubError::forbidden("You cannot delete your own account."));
        }

        let mut user = self.users.get_by_id(id).await?;
        if !user.lifecycle.is_active() {
            return Err(RhubError::not_found("User"));
        }
        if self.users.has_active_requisition(id).await? {
            return Err(RhubError::conflict(
                "Cannot delete user. They are assigned to active People Requisitions.",
            ));
        }

        user.lifecycle = Lifecycle::Deleted;
        user.audit.record_deleted(&requester.user_code);
        self.users.save(&user).await?;

        info!(user_code = %user.user_code, "User deleted");
        Ok(())
    }

    /// Validate whichever references are present; missing or deleted
    /// rows collapse into one generic error.
    async fn validate_references(
        &self,
        role_id: Option<Uuid>,
        department_id: Option<Uuid>,
        job_position_id: Option<Uuid>,
    ) -> RhubResult<()> {
        if let Some(role_id) = role_id {
            match self.roles.get_by_id(role_id).await {
                Ok(role) if role.lifecycle.is_active() => {}
                Ok(_) | Err(RhubError::NotFound { .. }) => return Err(invalid_references()),
                Err(e) => return Err(e),
            }
        }
        if let Some(department_id) = department_id {
            active_lookup(&self.departments, department_id).await?;
        }
        if let Some(job_position_id) = job_position_id {
            active_lookup(&self.job_positions, job_position_id).await?;
        }
        Ok(())
    }
}

fn require_admin(requester: &Requester) -> RhubResult<()> {
    if requester.role != RoleKind::Admin {
        return Err(RhubError::forbidden("Only an Admin may manage users."));
    }
    Ok(())
}

fn invalid_references() -> RhubError {
    RhubError::invalid_input("One or more referenced fields are invalid.")
}

async fn active_lookup<L: LookupRepository>(repo: &L, id: Uuid) -> RhubResult<LookupEntry> {
    match repo.get_by_id(id).await {
        Ok(entry) if entry.lifecycle.is_active() => Ok(entry),
        Ok(_) => Err(invalid_references()),
        Err(RhubError::NotFound { .. }) => Err(invalid_references()),
        Err(e) => Err(e),
    }
}

/// Minimal structural check: one `@` with a dotted domain.
fn email_shape_ok(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(' ')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(email_shape_ok("alice@example.com"));
        assert!(!email_shape_ok("alice"));
        assert!(!email_shape_ok("@example.com"));
        assert!(!email_shape_ok("alice@example"));
        assert!(!email_shape_ok("alice@.com"));
        assert!(!email_shape_ok("a lice@example.com"));
    }
}
