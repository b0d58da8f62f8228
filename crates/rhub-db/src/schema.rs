//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Soft deletion is a `lifecycle`
//! field; rows are never removed.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Roles (seeded: Admin, HRBP, Recruiter)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD lifecycle ON TABLE role TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE role TYPE option<string>;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE role TYPE option<string>;
DEFINE FIELD modified_at ON TABLE role TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE role TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE role TYPE option<datetime>;
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Master lookup tables (same shape, one table per kind)
-- =======================================================================
DEFINE TABLE department SCHEMAFULL;
DEFINE FIELD name ON TABLE department TYPE string;
DEFINE FIELD lifecycle ON TABLE department TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE department TYPE option<string>;
DEFINE FIELD created_at ON TABLE department TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE department TYPE option<string>;
DEFINE FIELD modified_at ON TABLE department TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE department TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE department TYPE option<datetime>;

DEFINE TABLE job_position SCHEMAFULL;
DEFINE FIELD name ON TABLE job_position TYPE string;
DEFINE FIELD lifecycle ON TABLE job_position TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE job_position TYPE option<string>;
DEFINE FIELD created_at ON TABLE job_position TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE job_position TYPE option<string>;
DEFINE FIELD modified_at ON TABLE job_position TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE job_position TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE job_position TYPE option<datetime>;

DEFINE TABLE nature_of_employment SCHEMAFULL;
DEFINE FIELD name ON TABLE nature_of_employment TYPE string;
DEFINE FIELD lifecycle ON TABLE nature_of_employment TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE nature_of_employment \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE nature_of_employment TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE nature_of_employment \
    TYPE option<string>;
DEFINE FIELD modified_at ON TABLE nature_of_employment \
    TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE nature_of_employment \
    TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE nature_of_employment \
    TYPE option<datetime>;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD user_code ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role_id ON TABLE user TYPE string;
DEFINE FIELD department_id ON TABLE user TYPE string;
DEFINE FIELD job_position_id ON TABLE user TYPE string;
DEFINE FIELD reset_token ON TABLE user TYPE option<string>;
DEFINE FIELD reset_token_expires_at ON TABLE user \
    TYPE option<datetime>;
DEFINE FIELD lifecycle ON TABLE user TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE user TYPE option<string>;
DEFINE FIELD modified_at ON TABLE user TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE user TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE user TYPE option<datetime>;
DEFINE INDEX idx_user_code ON TABLE user COLUMNS user_code UNIQUE;

-- =======================================================================
-- People Requisitions
-- =======================================================================
DEFINE TABLE requisition SCHEMAFULL;
DEFINE FIELD job_code ON TABLE requisition TYPE string;
DEFINE FIELD job_position_id ON TABLE requisition TYPE string;
DEFINE FIELD department_id ON TABLE requisition TYPE string;
DEFINE FIELD recruiter_id ON TABLE requisition TYPE string;
DEFINE FIELD hrbp_id ON TABLE requisition TYPE string;
DEFINE FIELD nature_of_employment_id ON TABLE requisition TYPE string;
DEFINE FIELD job_description ON TABLE requisition TYPE option<string>;
DEFINE FIELD prf_number ON TABLE requisition TYPE option<string>;
DEFINE FIELD prf_link ON TABLE requisition TYPE option<string>;
DEFINE FIELD closing_date ON TABLE requisition TYPE option<datetime>;
DEFINE FIELD status ON TABLE requisition TYPE string \
    ASSERT $value IN ['open', 'inprogress', 'onhold', 'completed', \
    'closed'] DEFAULT 'open';
DEFINE FIELD approved_by_hrbp ON TABLE requisition TYPE bool \
    DEFAULT false;
DEFINE FIELD jd_file_name ON TABLE requisition TYPE option<string>;
DEFINE FIELD jd_stored_path ON TABLE requisition TYPE option<string>;
DEFINE FIELD jd_uploaded_at ON TABLE requisition TYPE option<datetime>;
DEFINE FIELD lifecycle ON TABLE requisition TYPE string \
    ASSERT $value IN ['Active', 'Deleted'] DEFAULT 'Active';
DEFINE FIELD created_by ON TABLE requisition TYPE option<string>;
DEFINE FIELD created_at ON TABLE requisition TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD modified_by ON TABLE requisition TYPE option<string>;
DEFINE FIELD modified_at ON TABLE requisition TYPE option<datetime>;
DEFINE FIELD deleted_by ON TABLE requisition TYPE option<string>;
DEFINE FIELD deleted_at ON TABLE requisition TYPE option<datetime>;
DEFINE INDEX idx_requisition_job_code ON TABLE requisition \
    COLUMNS job_code UNIQUE;

-- =======================================================================
-- Prefix counters (record id is the prefix itself)
-- =======================================================================
DEFINE TABLE prefix_counter SCHEMAFULL;
DEFINE FIELD count ON TABLE prefix_counter TYPE int DEFAULT 0;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await?
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;
        }
    }

    Ok(())
}
