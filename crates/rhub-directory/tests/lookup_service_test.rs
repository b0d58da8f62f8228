//! Integration tests for the lookup service using in-memory SurrealDB.

use rhub_core::error::RhubError;
use rhub_core::identity::{Requester, RoleKind};
use rhub_core::models::requisition::NewRequisition;
use rhub_core::models::user::CreateUser;
use rhub_core::repository::{
    LookupRepository, PageRequest, RequisitionRepository, RoleRepository, UserRepository,
};
use rhub_db::repository::{
    SurrealLookupRepository, SurrealRequisitionRepository, SurrealRoleRepository,
    SurrealUserRepository,
};
use rhub_directory::LookupService;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

async fn setup() -> (Surreal<Db>, LookupService<SurrealLookupRepository<Db>>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rhub_db::run_migrations(&db).await.unwrap();

    let service = LookupService::new(SurrealLookupRepository::department(db.clone()));
    (db, service)
}

fn admin() -> Requester {
    Requester {
        user_id: Uuid::new_v4(),
        user_code: "RHUB-000".into(),
        role: RoleKind::Admin,
        name: "Ada Admin".into(),
        email: "ada@example.com".into(),
    }
}

fn recruiter() -> Requester {
    Requester {
        user_id: Uuid::new_v4(),
        user_code: "RHUB-009".into(),
        role: RoleKind::Recruiter,
        name: "Rita Recruiter".into(),
        email: "rita@example.com".into(),
    }
}

#[tokio::test]
async fn create_normalizes_and_enforces_uniqueness() {
    let (_db, service) = setup().await;
    let admin = admin();

    let created = service.create(&admin, "  human   resources ").await.unwrap();
    assert_eq!(created.name, "Human Resources");
    assert_eq!(created.audit.created_by.as_deref(), Some("RHUB-000"));

    // Differently-cased duplicates collide after normalization.
    let err = service.create(&admin, "HUMAN RESOURCES").await.unwrap_err();
    assert!(matches!(err, RhubError::Conflict { .. }));

    let err = service.create(&admin, "   ").await.unwrap_err();
    assert!(matches!(err, RhubError::InvalidInput { .. }));
}

#[tokio::test]
async fn mutations_are_admin_only() {
    let (_db, service) = setup().await;

    let err = service.create(&recruiter(), "Engineering").await.unwrap_err();
    assert!(matches!(err, RhubError::Forbidden { .. }));
}

#[tokio::test]
async fn rename_checks_uniqueness_but_allows_self() {
    let (_db, service) = setup().await;
    let admin = admin();

    let engineering = service.create(&admin, "Engineering").await.unwrap();
    service.create(&admin, "Marketing").await.unwrap();

    // Renaming onto another entry's name conflicts.
    let err = service
        .rename(&admin, engineering.id, "marketing")
        .await
        .unwrap_err();
    assert!(matches!(err, RhubError::Conflict { .. }));

    // Re-casing itself is fine.
    let renamed = service
        .rename(&admin, engineering.id, "ENGINEERING")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Engineering");
}

#[tokio::test]
async fn removed_entries_are_hidden_and_name_is_freed() {
    let (_db, service) = setup().await;
    let admin = admin();

    let entry = service.create(&admin, "Engineering").await.unwrap();
    service.remove(&admin, entry.id).await.unwrap();

    let err = service.get(entry.id).await.unwrap_err();
    assert!(matches!(err, RhubError::NotFound { .. }));

    let page = service.list(None, PageRequest::default()).await.unwrap();
    assert_eq!(page.total, 0);

    // The name can be reused by a fresh entry.
    service.create(&admin, "Engineering").await.unwrap();
}

#[tokio::test]
async fn in_use_entries_cannot_be_renamed_or_removed() {
    let (db, service) = setup().await;
    let admin = admin();

    let department = service.create(&admin, "Engineering").await.unwrap();
    let position = SurrealLookupRepository::job_position(db.clone())
        .create(rhub_core::models::lookup::CreateLookupEntry {
            name: "Backend Engineer".into(),
            created_by: None,
        })
        .await
        .unwrap();
    let nature = SurrealLookupRepository::nature_of_employment(db.clone())
        .create(rhub_core::models::lookup::CreateLookupEntry {
            name: "Full Time".into(),
            created_by: None,
        })
        .await
        .unwrap();

    let role = SurrealRoleRepository::new(db.clone())
        .create("Recruiter")
        .await
        .unwrap();
    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            user_code: "RHUB-001".into(),
            name: "Rita Recruiter".into(),
            email: "rita@example.com".into(),
            password: "Temp@Pass1".into(),
            role_id: role.id,
            department_id: department.id,
            job_position_id: position.id,
            created_by: None,
        })
        .await
        .unwrap();

    // Referenced by an active user.
    let err = service.remove(&admin, department.id).await.unwrap_err();
    assert!(matches!(err, RhubError::Conflict { .. }));
    let err = service
        .rename(&admin, department.id, "Platform")
        .await
        .unwrap_err();
    assert!(matches!(err, RhubError::Conflict { .. }));

    // Natures are only referenced by requisitions.
    let natures = LookupService::new(SurrealLookupRepository::nature_of_employment(db.clone()));
    SurrealRequisitionRepository::new(db.clone())
        .create(NewRequisition {
            job_code: "BE001".into(),
            job_position_id: position.id,
            department_id: department.id,
            recruiter_id: user.id,
            hrbp_id: user.id,
            nature_of_employment_id: nature.id,
            job_description: None,
            prf_number: None,
            prf_link: None,
            closing_date: None,
            created_by: None,
        })
        .await
        .unwrap();
    let err = natures.remove(&admin, nature.id).await.unwrap_err();
    assert!(matches!(err, RhubError::Conflict { .. }));
}
