//! SurrealDB implementation of [`RequisitionRepository`].

use chrono::{DateTime, Utc};
use rhub_core::error::RhubResult;
use rhub_core::models::audit::Audit;
use rhub_core::models::requisition::{JdFile, NewRequisition, Requisition, RequisitionStatus};
use rhub_core::repository::{
    Page, PageRequest, RequisitionFilter, RequisitionRepository, RequisitionSort,
    RequisitionSortField, SortOrder,
};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::{lifecycle_str, parse_lifecycle};

/// Identity helper that pins a filter-binding closure to a single query
/// lifetime, which closure syntax alone cannot express.
fn pin_binder<'a, C, F>(f: F) -> F
where
    C: Connection,
    F: Fn(surrealdb::method::Query<'a, C>) -> surrealdb::method::Query<'a, C>,
{
    f
}

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct RequisitionRow {
    job_code: String,
    job_position_id: String,
    department_id: String,
    recruiter_id: String,
    hrbp_id: String,
    nature_of_employment_id: String,
    job_description: Option<String>,
    prf_number: Option<String>,
    prf_link: Option<String>,
    closing_date: Option<DateTime<Utc>>,
    status: String,
    approved_by_hrbp: bool,
    jd_file_name: Option<String>,
    jd_stored_path: Option<String>,
    jd_uploaded_at: Option<DateTime<Utc>>,
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
struct RequisitionRowWithId {
    record_id: String,
    job_code: String,
    job_position_id: String,
    department_id: String,
    recruiter_id: String,
    hrbp_id: String,
    nature_of_employment_id: String,
    job_description: Option<String>,
    prf_number: Option<String>,
    prf_link: Option<String>,
    closing_date: Option<DateTime<Utc>>,
    status: String,
    approved_by_hrbp: bool,
    jd_file_name: Option<String>,
    jd_stored_path: Option<String>,
    jd_uploaded_at: Option<DateTime<Utc>>,
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

fn parse_status(s: &str) -> Result<RequisitionStatus, DbError> {
    RequisitionStatus::parse(s)
        .ok_or_else(|| DbError::Internal(format!("unknown requisition status: {s}")))
}

fn parse_jd_file(
    file_name: Option<String>,
    stored_path: Option<String>,
    uploaded_at: Option<DateTime<Utc>>,
) -> Result<Option<JdFile>, DbError> {
    match (file_name, stored_path, uploaded_at) {
        (Some(file_name), Some(stored_path), Some(uploaded_at)) => Ok(Some(JdFile {
            file_name,
            stored_path,
            uploaded_at,
        })),
        (None, None, None) => Ok(None),
        _ => Err(DbError::Internal(
            "partially populated jd_file columns".into(),
        )),
    }
}

impl RequisitionRow {
    fn into_requisition(self, id: Uuid) -> Result<Requisition, DbError> {
        let parse = |field: &str, value: &str| {
            Uuid::parse_str(value)
                .map_err(|e| DbError::Internal(format!("invalid {field} UUID: {e}")))
        };
        Ok(Requisition {
            id,
            job_code: self.job_code,
            job_position_id: parse("job position", &self.job_position_id)?,
            department_id: parse("department", &self.department_id)?,
            recruiter_id: parse("recruiter", &self.recruiter_id)?,
            hrbp_id: parse("hrbp", &self.hrbp_id)?,
            nature_of_employment_id: parse(
                "nature of employment",
                &self.nature_of_employment_id,
            )?,
            job_description: self.job_description,
            prf_number: self.prf_number,
            prf_link: self.prf_link,
            closing_date: self.closing_date,
            status: parse_status(&self.status)?,
            approved_by_hrbp: self.approved_by_hrbp,
            jd_file: parse_jd_file(self.jd_file_name, self.jd_stored_path, self.jd_uploaded_at)?,
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

impl RequisitionRowWithId {
    fn try_into_requisition(self) -> Result<Requisition, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Internal(format!("invalid UUID: {e}")))?;
        RequisitionRow {
            job_code: self.job_code,
            job_position_id: self.job_position_id,
            department_id: self.department_id,
            recruiter_id: self.recruiter_id,
            hrbp_id: self.hrbp_id,
            nature_of_employment_id: self.nature_of_employment_id,
            job_description: self.job_description,
            prf_number: self.prf_number,
            prf_link: self.prf_link,
            closing_date: self.closing_date,
            status: self.status,
            approved_by_hrbp: self.approved_by_hrbp,
            jd_file_name: self.jd_file_name,
            jd_stored_path: self.jd_stored_path,
            jd_uploaded_at: self.jd_uploaded_at,
            lifecycle: self.lifecycle,
            created_by: self.created_by,
            created_at: self.created_at,
            modified_by: self.modified_by,
            modified_at: self.modified_at,
            deleted_by: self.deleted_by,
            deleted_at: self.deleted_at,
        }
        .into_requisition(id)
    }
}

fn sort_column(field: RequisitionSortField) -> &'static str {
    match field {
        RequisitionSortField::CreatedAt => "created_at",
        RequisitionSortField::ClosingDate => "closing_date",
        RequisitionSortField::JobCode => "job_code",
        RequisitionSortField::Status => "status",
    }
}

fn sort_direction(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

/// SurrealDB implementation of the Requisition repository.
#[derive(Clone)]
pub struct SurrealRequisitionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRequisitionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RequisitionRepository for SurrealRequisitionRepository<C> {
    async fn create(&self, input: NewRequisition) -> RhubResult<Requisition> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('requisition', $id) SET \
                 job_code = $job_code, \
                 job_position_id = $job_position_id, \
                 department_id = $department_id, \
                 recruiter_id = $recruiter_id, hrbp_id = $hrbp_id, \
                 nature_of_employment_id = $nature_of_employment_id, \
                 job_description = $job_description, \
                 prf_number = $prf_number, prf_link = $prf_link, \
                 closing_date = $closing_date, \
                 status = 'open', approved_by_hrbp = false, \
                 jd_file_name = NONE, jd_stored_path = NONE, \
                 jd_uploaded_at = NONE, \
                 lifecycle = 'Active', created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("job_code", input.job_code))
            .bind(("job_position_id", input.job_position_id.to_string()))
            .bind(("department_id", input.department_id.to_string()))
            .bind(("recruiter_id", input.recruiter_id.to_string()))
            .bind(("hrbp_id", input.hrbp_id.to_string()))
            .bind((
                "nature_of_employment_id",
                input.nature_of_employment_id.to_string(),
            ))
            .bind(("job_description", input.job_description))
            .bind(("prf_number", input.prf_number))
            .bind(("prf_link", input.prf_link))
            .bind(("closing_date", input.closing_date))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let rows: Vec<RequisitionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "People Requisition".into(),
            id: id_str,
        })?;

        Ok(row.into_requisition(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RhubResult<Requisition> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('requisition', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RequisitionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "People Requisition".into(),
            id: id_str,
        })?;

        Ok(row.into_requisition(id)?)
    }

    async fn find_active_by_triple(
        &self,
        job_position_id: Uuid,
        department_id: Uuid,
        nature_of_employment_id: Uuid,
    ) -> RhubResult<Option<Requisition>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM requisition \
                 WHERE job_position_id = $job_position_id \
                 AND department_id = $department_id \
                 AND nature_of_employment_id = $nature_of_employment_id \
                 AND status IN ['open', 'inprogress'] \
                 AND lifecycle = 'Active'",
            )
            .bind(("job_position_id", job_position_id.to_string()))
            .bind(("department_id", department_id.to_string()))
            .bind((
                "nature_of_employment_id",
                nature_of_employment_id.to_string(),
            ))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RequisitionRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_requisition()?)),
            None => Ok(None),
        }
    }

    async fn save(&self, requisition: &Requisition) -> RhubResult<()> {
        let (jd_file_name, jd_stored_path, jd_uploaded_at) = match &requisition.jd_file {
            Some(jd) => (
                Some(jd.file_name.clone()),
                Some(jd.stored_path.clone()),
                Some(jd.uploaded_at),
            ),
            None => (None, None, None),
        };

        self.db
            .query(
                "UPDATE type::record('requisition', $id) SET \
                 recruiter_id = $recruiter_id, \
                 department_id = $department_id, \
                 nature_of_employment_id = $nature_of_employment_id, \
                 job_description = $job_description, \
                 prf_number = $prf_number, prf_link = $prf_link, \
                 closing_date = $closing_date, \
                 status = $status, \
                 approved_by_hrbp = $approved_by_hrbp, \
                 jd_file_name = $jd_file_name, \
                 jd_stored_path = $jd_stored_path, \
                 jd_uploaded_at = $jd_uploaded_at, \
                 lifecycle = $lifecycle, \
                 modified_by = $modified_by, modified_at = $modified_at, \
                 deleted_by = $deleted_by, deleted_at = $deleted_at",
            )
            .bind(("id", requisition.id.to_string()))
            .bind(("recruiter_id", requisition.recruiter_id.to_string()))
            .bind(("department_id", requisition.department_id.to_string()))
            .bind((
                "nature_of_employment_id",
                requisition.nature_of_employment_id.to_string(),
            ))
            .bind(("job_description", requisition.job_description.clone()))
            .bind(("prf_number", requisition.prf_number.clone()))
            .bind(("prf_link", requisition.prf_link.clone()))
            .bind(("closing_date", requisition.closing_date))
            .bind(("status", requisition.status.as_str().to_string()))
            .bind(("approved_by_hrbp", requisition.approved_by_hrbp))
            .bind(("jd_file_name", jd_file_name))
            .bind(("jd_stored_path", jd_stored_path))
            .bind(("jd_uploaded_at", jd_uploaded_at))
            .bind((
                "lifecycle",
                lifecycle_str(requisition.lifecycle).to_string(),
            ))
            .bind(("modified_by", requisition.audit.modified_by.clone()))
            .bind(("modified_at", requisition.audit.modified_at))
            .bind(("deleted_by", requisition.audit.deleted_by.clone()))
            .bind(("deleted_at", requisition.audit.deleted_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn list(
        &self,
        filter: &RequisitionFilter,
        sort: RequisitionSort,
        page: PageRequest,
    ) -> RhubResult<Page<Requisition>> {
        let mut conditions = vec!["lifecycle = 'Active'"];
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.department_id.is_some() {
            conditions.push("department_id = $department_id");
        }
        if filter.recruiter_id.is_some() {
            conditions.push("recruiter_id = $recruiter_id");
        }
        if filter.approved_only {
            conditions.push("approved_by_hrbp = true");
        }
        if filter.code_search.is_some() {
            conditions.push("string::contains(string::lowercase(job_code), $code_search)");
        }
        let where_clause = conditions.join(" AND ");
        let code_search_lower = filter
            .code_search
            .as_deref()
            .map(|s| s.trim().to_lowercase());

        let bind_filters = pin_binder(|mut query: surrealdb::method::Query<'_, C>| {
            if let Some(status) = filter.status {
                query = query.bind(("status", status.as_str().to_string()));
            }
            if let Some(department_id) = filter.department_id {
                query = query.bind(("department_id", department_id.to_string()));
            }
            if let Some(recruiter_id) = filter.recruiter_id {
                query = query.bind(("recruiter_id", recruiter_id.to_string()));
            }
            if let Some(ref s) = code_search_lower {
                query = query.bind(("code_search", s.clone()));
            }
            query
        });

        let count_query = bind_filters(self.db.query(format!(
            "SELECT count() AS total FROM requisition WHERE {where_clause} GROUP ALL"
        )));
        let mut count_result = count_query.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        // Sort column and direction come from a fixed whitelist, never
        // from caller-supplied strings.
        let query = bind_filters(
            self.db
                .query(format!(
                    "SELECT meta::id(id) AS record_id, * FROM requisition \
                     WHERE {where_clause} \
                     ORDER BY {column} {direction} \
                     LIMIT $limit START $offset",
                    column = sort_column(sort.field),
                    direction = sort_direction(sort.order),
                ))
                .bind(("limit", page.limit))
                .bind(("offset", page.offset())),
        );
        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<RequisitionRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_requisition())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }
}
