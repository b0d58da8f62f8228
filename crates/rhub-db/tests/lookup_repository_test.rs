//! Integration tests for the lookup repositories using in-memory
//! SurrealDB.

use rhub_core::models::audit::Lifecycle;
use rhub_core::models::lookup::CreateLookupEntry;
use rhub_core::models::requisition::NewRequisition;
use rhub_core::models::user::CreateUser;
use rhub_core::repository::{
    LookupRepository, PageRequest, RequisitionRepository, RoleRepository, UserRepository,
};
use rhub_db::repository::{
    SurrealLookupRepository, SurrealRequisitionRepository, SurrealRoleRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rhub_db::run_migrations(&db).await.unwrap();
    db
}

fn entry(name: &str) -> CreateLookupEntry {
    CreateLookupEntry {
        name: name.into(),
        created_by: None,
    }
}

#[tokio::test]
async fn create_and_find_by_name() {
    let db = setup().await;
    let repo = SurrealLookupRepository::department(db);

    let created = repo.create(entry("Engineering")).await.unwrap();
    assert_eq!(created.name, "Engineering");
    assert!(created.lifecycle.is_active());

    let found = repo.find_active_by_name("Engineering").await.unwrap();
    assert_eq!(found.unwrap().id, created.id);

    assert!(repo.find_active_by_name("Marketing").await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_name_skips_deleted() {
    let db = setup().await;
    let repo = SurrealLookupRepository::job_position(db);

    let mut created = repo.create(entry("Data Analyst")).await.unwrap();
    created.lifecycle = Lifecycle::Deleted;
    created.audit.record_deleted("RHUB-001");
    repo.save(&created).await.unwrap();

    assert!(
        repo.find_active_by_name("Data Analyst")
            .await
            .unwrap()
            .is_none()
    );

    // Direct loads still see the soft-deleted row.
    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert!(!fetched.lifecycle.is_active());
}

#[tokio::test]
async fn kinds_live_in_separate_tables() {
    let db = setup().await;
    let departments = SurrealLookupRepository::department(db.clone());
    let positions = SurrealLookupRepository::job_position(db);

    departments.create(entry("Shared Name")).await.unwrap();
    assert!(
        positions
            .find_active_by_name("Shared Name")
            .await
            .unwrap()
            .is_none(),
        "a department must not shadow a job position"
    );
}

#[tokio::test]
async fn list_searches_and_paginates() {
    let db = setup().await;
    let repo = SurrealLookupRepository::nature_of_employment(db);

    for name in ["Full Time", "Part Time", "Contract", "Internship"] {
        repo.create(entry(name)).await.unwrap();
    }

    let all = repo
        .list(None, PageRequest { page: 1, limit: 3 })
        .await
        .unwrap();
    assert_eq!(all.items.len(), 3);
    assert_eq!(all.total, 4);
    // Ordered by name.
    assert_eq!(all.items[0].name, "Contract");

    let matched = repo.list(Some("time"), PageRequest::default()).await.unwrap();
    assert_eq!(matched.total, 2);
}

#[tokio::test]
async fn in_active_use_tracks_requisitions_and_users() {
    let db = setup().await;
    let departments = SurrealLookupRepository::department(db.clone());
    let positions = SurrealLookupRepository::job_position(db.clone());
    let natures = SurrealLookupRepository::nature_of_employment(db.clone());

    let department = departments.create(entry("Engineering")).await.unwrap();
    let position = positions.create(entry("Backend Engineer")).await.unwrap();
    let nature = natures.create(entry("Full Time")).await.unwrap();

    assert!(!departments.in_active_use(department.id).await.unwrap());
    assert!(!natures.in_active_use(nature.id).await.unwrap());

    let role = SurrealRoleRepository::new(db.clone())
        .create("Recruiter")
        .await
        .unwrap();
    let user_repo = SurrealUserRepository::new(db.clone());
    let recruiter = user_repo
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

    // A user reference alone makes department and position in-use.
    assert!(departments.in_active_use(department.id).await.unwrap());
    assert!(positions.in_active_use(position.id).await.unwrap());
    // Users never reference natures of employment.
    assert!(!natures.in_active_use(nature.id).await.unwrap());

    let req_repo = SurrealRequisitionRepository::new(db.clone());
    let mut req = req_repo
        .create(NewRequisition {
            job_code: "BE001".into(),
            job_position_id: position.id,
            department_id: department.id,
            recruiter_id: recruiter.id,
            hrbp_id: recruiter.id,
            nature_of_employment_id: nature.id,
            job_description: None,
            prf_number: None,
            prf_link: None,
            closing_date: None,
            created_by: None,
        })
        .await
        .unwrap();

    assert!(natures.in_active_use(nature.id).await.unwrap());

    // A soft-deleted requisition releases the nature again.
    req.lifecycle = Lifecycle::Deleted;
    req_repo.save(&req).await.unwrap();
    assert!(!natures.in_active_use(nature.id).await.unwrap());
}
