//! SurrealDB implementation of [`LookupRepository`].
//!
//! One instance serves one [`LookupKind`]; the table name comes from
//! the kind, so departments, job positions, and natures of employment
//! share this code while living in separate tables.

use chrono::{DateTime, Utc};
use rhub_core::error::RhubResult;
use rhub_core::models::audit::Audit;
use rhub_core::models::lookup::{CreateLookupEntry, LookupEntry, LookupKind};
use rhub_core::repository::{LookupRepository, Page, PageRequest};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{lifecycle_str, parse_lifecycle};

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct LookupRow {
    name: String,
    lifecycle: String,
    created_by: Option<String>,
    created_at: DateTime<Utc>,
    modified_by: Option<String>,
    modified_at: Option<DateTime<Utc>>,
    deleted_by: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct LookupRowWithId {
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

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

impl LookupRow {
    fn into_entry(self, kind: LookupKind, id: Uuid) -> Result<LookupEntry, DbError> {
        Ok(LookupEntry {
            id,
            kind,
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

impl LookupRowWithId {
    fn try_into_entry(self, kind: LookupKind) -> Result<LookupEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Internal(format!("invalid UUID: {e}")))?;
        Ok(LookupEntry {
            id,
            kind,
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

/// SurrealDB implementation of a master lookup repository.
#[derive(Clone)]
pub struct SurrealLookupRepository<C: Connection> {
    db: Surreal<C>,
    kind: LookupKind,
}

impl<C: Connection> SurrealLookupRepository<C> {
    pub fn new(db: Surreal<C>, kind: LookupKind) -> Self {
        Self { db, kind }
    }

    pub fn department(db: Surreal<C>) -> Self {
        Self::new(db, LookupKind::Department)
    }

    pub fn job_position(db: Surreal<C>) -> Self {
        Self::new(db, LookupKind::JobPosition)
    }

    pub fn nature_of_employment(db: Surreal<C>) -> Self {
        Self::new(db, LookupKind::NatureOfEmployment)
    }

    fn table(&self) -> &'static str {
        self.kind.table()
    }
}

impl<C: Connection> LookupRepository for SurrealLookupRepository<C> {
    fn kind(&self) -> LookupKind {
        self.kind
    }

    async fn create(&self, input: CreateLookupEntry) -> RhubResult<LookupEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(format!(
                "CREATE type::record('{t}', $id) SET \
                 name = $name, lifecycle = 'Active', \
                 created_by = $created_by",
                t = self.table()
            ))
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let rows: Vec<LookupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: self.kind.label().into(),
            id: id_str,
        })?;

        Ok(row.into_entry(self.kind, id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RhubResult<LookupEntry> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(format!(
                "SELECT * FROM type::record('{t}', $id)",
                t = self.table()
            ))
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LookupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: self.kind.label().into(),
            id: id_str,
        })?;

        Ok(row.into_entry(self.kind, id)?)
    }

    async fn find_active_by_name(&self, name: &str) -> RhubResult<Option<LookupEntry>> {
        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM {t} \
                 WHERE name = $name AND lifecycle = 'Active'",
                t = self.table()
            ))
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LookupRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_entry(self.kind)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entry: &LookupEntry) -> RhubResult<()> {
        self.db
            .query(format!(
                "UPDATE type::record('{t}', $id) SET \
                 name = $name, lifecycle = $lifecycle, \
                 modified_by = $modified_by, modified_at = $modified_at, \
                 deleted_by = $deleted_by, deleted_at = $deleted_at",
                t = self.table()
            ))
            .bind(("id", entry.id.to_string()))
            .bind(("name", entry.name.clone()))
            .bind(("lifecycle", lifecycle_str(entry.lifecycle).to_string()))
            .bind(("modified_by", entry.audit.modified_by.clone()))
            .bind(("modified_at", entry.audit.modified_at))
            .bind(("deleted_by", entry.audit.deleted_by.clone()))
            .bind(("deleted_at", entry.audit.deleted_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, search: Option<&str>, page: PageRequest) -> RhubResult<Page<LookupEntry>> {
        let mut conditions = vec!["lifecycle = 'Active'"];
        if search.is_some() {
            conditions.push("string::contains(string::lowercase(name), $search)");
        }
        let where_clause = conditions.join(" AND ");
        let search_lower = search.map(|s| s.trim().to_lowercase());

        let mut count_query = self
            .db
            .query(format!(
                "SELECT count() AS total FROM {t} WHERE {where_clause} GROUP ALL",
                t = self.table()
            ));
        if let Some(ref s) = search_lower {
            count_query = count_query.bind(("search", s.clone()));
        }
        let mut count_result = count_query.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut query = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, * FROM {t} \
                 WHERE {where_clause} \
                 ORDER BY name ASC \
                 LIMIT $limit START $offset",
                t = self.table()
            ))
            .bind(("limit", page.limit))
            .bind(("offset", page.offset()));
        if let Some(s) = search_lower {
            query = query.bind(("search", s));
        }
        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<LookupRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry(self.kind))
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn in_active_use(&self, id: Uuid) -> RhubResult<bool> {
        let id_str = id.to_string();
        let requisition_column = match self.kind {
            LookupKind::Department => "department_id",
            LookupKind::JobPosition => "job_position_id",
            LookupKind::NatureOfEmployment => "nature_of_employment_id",
        };

        let mut result = self
            .db
            .query(format!(
                "SELECT count() AS total FROM requisition \
                 WHERE {requisition_column} = $id AND lifecycle = 'Active' \
                 GROUP ALL"
            ))
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Ok(true);
        }

        // Natures of employment are not referenced by users.
        let user_column = match self.kind {
            LookupKind::Department => Some("department_id"),
            LookupKind::JobPosition => Some("job_position_id"),
            LookupKind::NatureOfEmployment => None,
        };
        if let Some(column) = user_column {
            let mut result = self
                .db
                .query(format!(
                    "SELECT count() AS total FROM user \
                     WHERE {column} = $id AND lifecycle = 'Active' GROUP ALL"
                ))
                .bind(("id", id_str))
                .await
                .map_err(DbError::from)?;
            let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
            if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
