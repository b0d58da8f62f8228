//! SurrealDB implementation of [`RoleRepository`].

use chrono::{DateTime, Utc};
use rhub_core::error::RhubResult;
use rhub_core::models::audit::Audit;
use rhub_core::models::role::Role;
use rhub_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::parse_lifecycle;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    lifecycle: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
    modified_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    lifecycle: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
    modified_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

impl RoleRow {
    fn into_role(self, id: Uuid) -> Result<Role, DbError> {
        Ok(Role {
            id,
            name: self.name,
            lifecycle: parse_lifecycle(&self.lifecycle)?,
            audit: Audit {
                created_by: self.created_by,
                created_at: self.created_at,
                modified_by: self.modified_by,
                modified_at: self.modified_at,
                deleted_by: self.deleted_by,
                deleted_at: self.deleted_at,
            },
        })
    }
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Internal(format!("invalid UUID: {e}")))?;
        Ok(Role {
            id,
            name: self.name,
            lifecycle: parse_lifecycle(&self.lifecycle)?,
            audit: Audit {
                created_by: self.created_by,
                created_at: self.created_at,
                modified_by: self.modified_by,
                modified_at: self.modified_at,
                deleted_by: self.deleted_by,
                deleted_at: self.deleted_at,
            },
        })
    }
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, name: &str) -> RhubResult<Role> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 name = $name, lifecycle = 'Active', created_by = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RhubResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_name(&self, name: &str) -> RhubResult<Role> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE name = $name AND lifecycle = 'Active'",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "Role".into(),
            id: format!("name={name}"),
        })?;

        Ok(row.try_into_role()?)
    }

    async fn list(&self) -> RhubResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE lifecycle = 'Active' ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let roles = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }
}
