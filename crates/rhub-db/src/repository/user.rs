//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use rhub_core::error::RhubResult;
use rhub_core::models::audit::Audit;
use rhub_core::models::user::{CreateUser, User, UserFilter, UserWithRole};
use rhub_core::repository::{Page, PageRequest, UserRepository};
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
struct UserRow {
    user_code: String,
    name: String,
    email: String,
    password_hash: String,
    role_id: String,
    department_id: String,
    job_position_id: String,
    reset_token: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
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
struct UserRowWithId {
    record_id: String,
    user_code: String,
    name: String,
    email: String,
    password_hash: String,
    role_id: String,
    department_id: String,
    job_position_id: String,
    reset_token: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
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

/// Row struct for role-name projection.
#[derive(Debug, SurrealValue)]
struct RoleNameRow {
    name: String,
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        let parse = |field: &str, value: &str| {
            Uuid::parse_str(value)
                .map_err(|e| DbError::Internal(format!("invalid {field} UUID: {e}")))
        };
        Ok(User {
            id,
            user_code: self.user_code,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role_id: parse("role", &self.role_id)?,
            department_id: parse("department", &self.department_id)?,
            job_position_id: parse("job position", &self.job_position_id)?,
            reset_token: self.reset_token,
            reset_token_expires_at: self.reset_token_expires_at,
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

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Internal(format!("invalid UUID: {e}")))?;
        UserRow {
            user_code: self.user_code,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role_id: self.role_id,
            department_id: self.department_id,
            job_position_id: self.job_position_id,
            reset_token: self.reset_token,
            reset_token_expires_at: self.reset_token_expires_at,
            lifecycle: self.lifecycle,
            created_by: self.created_by,
            created_at: self.created_at,
            modified_by: self.modified_by,
            modified_at: self.modified_at,
            deleted_by: self.deleted_by,
            deleted_at: self.deleted_at,
        }
        .into_user(id)
    }
}

/// Hash a password with Argon2id using OWASP-recommended parameters.
fn hash_password(password: &str) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Internal(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against an Argon2id PHC-format hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or an error
/// if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, DbError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| DbError::Internal(format!("invalid hash format: {e}")))?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DbError::Internal(format!("verify error: {e}"))),
    }
}

/// SurrealDB implementation of the User repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> RhubResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password)?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 user_code = $user_code, name = $name, email = $email, \
                 password_hash = $password_hash, \
                 role_id = $role_id, department_id = $department_id, \
                 job_position_id = $job_position_id, \
                 reset_token = NONE, reset_token_expires_at = NONE, \
                 lifecycle = 'Active', created_by = $created_by",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_code", input.user_code))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", password_hash))
            .bind(("role_id", input.role_id.to_string()))
            .bind(("department_id", input.department_id.to_string()))
            .bind(("job_position_id", input.job_position_id.to_string()))
            .bind(("created_by", input.created_by))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "User".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> RhubResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "User".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_with_role(&self, id: Uuid) -> RhubResult<UserWithRole> {
        let user = self.get_by_id(id).await?;

        let mut result = self
            .db
            .query("SELECT name FROM type::record('role', $id)")
            .bind(("id", user.role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleNameRow> = result.take(0).map_err(DbError::from)?;
        let role_name = rows
            .into_iter()
            .next()
            .map(|r| r.name)
            .ok_or_else(|| DbError::NotFound {
                entity: "Role".into(),
                id: user.role_id.to_string(),
            })?;

        Ok(UserWithRole { user, role_name })
    }

    async fn find_active_by_email(&self, email: &str) -> RhubResult<Option<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email AND lifecycle = 'Active'",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_user()?)),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &User) -> RhubResult<()> {
        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 name = $name, email = $email, \
                 role_id = $role_id, department_id = $department_id, \
                 job_position_id = $job_position_id, \
                 reset_token = $reset_token, \
                 reset_token_expires_at = $reset_token_expires_at, \
                 lifecycle = $lifecycle, \
                 modified_by = $modified_by, modified_at = $modified_at, \
                 deleted_by = $deleted_by, deleted_at = $deleted_at",
            )
            .bind(("id", user.id.to_string()))
            .bind(("name", user.name.clone()))
            .bind(("email", user.email.clone()))
            .bind(("role_id", user.role_id.to_string()))
            .bind(("department_id", user.department_id.to_string()))
            .bind(("job_position_id", user.job_position_id.to_string()))
            .bind(("reset_token", user.reset_token.clone()))
            .bind(("reset_token_expires_at", user.reset_token_expires_at))
            .bind(("lifecycle", lifecycle_str(user.lifecycle).to_string()))
            .bind(("modified_by", user.audit.modified_by.clone()))
            .bind(("modified_at", user.audit.modified_at))
            .bind(("deleted_by", user.audit.deleted_by.clone()))
            .bind(("deleted_at", user.audit.deleted_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn set_password(&self, id: Uuid, raw_password: &str) -> RhubResult<()> {
        let password_hash = hash_password(raw_password)?;

        self.db
            .query(
                "UPDATE type::record('user', $id) SET \
                 password_hash = $password_hash, \
                 modified_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> RhubResult<Page<User>> {
        let mut conditions = vec!["lifecycle = 'Active'"];
        if filter.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(name), $search) \
                 OR string::contains(string::lowercase(email), $search))",
            );
        }
        if filter.role_id.is_some() {
            conditions.push("role_id = $role_id");
        }
        if filter.department_id.is_some() {
            conditions.push("department_id = $department_id");
        }
        let where_clause = conditions.join(" AND ");
        let search_lower = filter.search.as_deref().map(|s| s.trim().to_lowercase());

        let bind_filters = pin_binder(|mut query: surrealdb::method::Query<'_, C>| {
            if let Some(ref s) = search_lower {
                query = query.bind(("search", s.clone()));
            }
            if let Some(role_id) = filter.role_id {
                query = query.bind(("role_id", role_id.to_string()));
            }
            if let Some(department_id) = filter.department_id {
                query = query.bind(("department_id", department_id.to_string()));
            }
            query
        });

        let count_query = bind_filters(self.db.query(format!(
            "SELECT count() AS total FROM user WHERE {where_clause} GROUP ALL"
        )));
        let mut count_result = count_query.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = bind_filters(
            self.db
                .query(format!(
                    "SELECT meta::id(id) AS record_id, * FROM user \
                     WHERE {where_clause} \
                     ORDER BY created_at DESC \
                     LIMIT $limit START $offset"
                ))
                .bind(("limit", page.limit))
                .bind(("offset", page.offset())),
        );
        let mut result = query.await.map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(Page {
            items,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn has_active_requisition(&self, user_id: Uuid) -> RhubResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM requisition \
                 WHERE (recruiter_id = $id OR hrbp_id = $id) \
                 AND lifecycle = 'Active' AND status != 'completed' \
                 GROUP ALL",
            )
            .bind(("id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }
}
