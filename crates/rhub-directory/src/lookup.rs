//! Master lookup service — name-unique CRUD with in-use guards.
//!
//! One service instance manages one lookup kind (departments, job
//! positions, or natures of employment); the kind comes from the
//! underlying repository.

use rhub_core::error::{RhubError, RhubResult};
use rhub_core::identity::{Requester, RoleKind};
use rhub_core::models::audit::Lifecycle;
use rhub_core::models::lookup::{CreateLookupEntry, LookupEntry};
use rhub_core::repository::{LookupRepository, Page, PageRequest};
use tracing::info;
use uuid::Uuid;

/// Trim and title-case a lookup name ("senior   software engineer"
/// becomes "Senior Software Engineer").
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct LookupService<L: LookupRepository> {
    repo: L,
}

impl<L: LookupRepository> LookupService<L> {
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    fn label(&self) -> &'static str {
        self.repo.kind().label()
    }

    fn require_admin(&self, requester: &Requester) -> RhubResult<()> {
        if requester.role != RoleKind::Admin {
            return Err(RhubError::forbidden(format!(
                "Only an Admin may manage {label} entries.",
                label = self.label().to_lowercase(),
            )));
        }
        Ok(())
    }

    /// Create an entry with a normalized, unique name.
    pub async fn create(&self, requester: &Requester, name: &str) -> RhubResult<LookupEntry> {
        self.require_admin(requester)?;

        let name = normalize_name(name);
        if name.is_empty() {
            return Err(RhubError::invalid_input(format!(
                "{label} name cannot be empty.",
                label = self.label(),
            )));
        }
        if self.repo.find_active_by_name(&name).await?.is_some() {
            return Err(RhubError::conflict(format!(
                "{label} name already exists.",
                label = self.label(),
            )));
        }

        let entry = self
            .repo
            .create(CreateLookupEntry {
                name,
                created_by: Some(requester.user_code.clone()),
            })
            .await?;

        info!(kind = self.label(), name = %entry.name, "Lookup entry created");
        Ok(entry)
    }

    /// Fetch one entry; deleted entries are reported as missing.
    pub async fn get(&self, id: Uuid) -> RhubResult<LookupEntry> {
        let entry = self.repo.get_by_id(id).await?;
        if !entry.lifecycle.is_active() {
            return Err(RhubError::not_found(self.label()));
        }
        Ok(entry)
    }

    /// Paginated, searchable list of active entries.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> RhubResult<Page<LookupEntry>> {
        self.repo.list(search, page).await
    }

    /// Rename an entry. Refused while any active requisition or user
    /// references it.
    pub async fn rename(
        &self,
        requester: &Requester,
        id: Uuid,
        new_name: &str,
    ) -> RhubResult<LookupEntry> {
        self.require_admin(requester)?;

        let mut entry = self.get(id).await?;
        if self.repo.in_active_use(id).await? {
            return Err(RhubError::conflict(format!(
                "{label} is in use and cannot be edited.",
                label = self.label(),
            )));
        }

        let name = normalize_name(new_name);
        if name.is_empty() {
            return Err(RhubError::invalid_input(format!(
                "{label} name cannot be empty.",
                label = self.label(),
            )));
        }
        if let Some(other) = self.repo.find_active_by_name(&name).await? {
            if other.id != id {
                return Err(RhubError::conflict(format!(
                    "{label} name already exists.",
                    label = self.label(),
                )));
            }
        }

        entry.name = name;
        entry.audit.record_modified(&requester.user_code);
        self.repo.save(&entry).await?;
        Ok(entry)
    }

    /// Soft-delete an entry. Refused while any active requisition or
    /// user references it.
    pub async fn remove(&self, requester: &Requester, id: Uuid) -> RhubResult<()> {
        self.require_admin(requester)?;

        let mut entry = self.get(id).await?;
        if self.repo.in_active_use(id).await? {
            return Err(RhubError::conflict(format!(
                "{label} is in use and cannot be deleted.",
                label = self.label(),
            )));
        }

        entry.lifecycle = Lifecycle::Deleted;
        entry.audit.record_deleted(&requester.user_code);
        self.repo.save(&entry).await?;

        info!(kind = self.label(), name = %entry.name, "Lookup entry deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_title_cased() {
        assert_eq!(normalize_name("  senior   software engineer "), "Senior Software Engineer");
        assert_eq!(normalize_name("ENGINEERING"), "Engineering");
        assert_eq!(normalize_name(""), "");
    }
}
