//! Integration tests for the Requisition repository using in-memory
//! SurrealDB.

use chrono::{Duration, Utc};
use rhub_core::models::audit::Lifecycle;
use rhub_core::models::lookup::CreateLookupEntry;
use rhub_core::models::requisition::{JdFile, NewRequisition, RequisitionStatus};
use rhub_core::models::user::CreateUser;
use rhub_core::repository::{
    LookupRepository, PageRequest, RequisitionFilter, RequisitionRepository, RequisitionSort,
    RequisitionSortField, RoleRepository, SortOrder, UserRepository,
};
use rhub_db::repository::{
    SurrealLookupRepository, SurrealRequisitionRepository, SurrealRoleRepository,
    SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

struct Fixture {
    db: Surreal<surrealdb::engine::local::Db>,
    job_position_id: Uuid,
    department_id: Uuid,
    nature_id: Uuid,
    recruiter_id: Uuid,
    hrbp_id: Uuid,
}

/// Helper: spin up in-memory DB, run migrations, seed the references
/// every requisition needs.
async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rhub_db::run_migrations(&db).await.unwrap();

    let role = SurrealRoleRepository::new(db.clone())
        .create("Recruiter")
        .await
        .unwrap();

    let department = SurrealLookupRepository::department(db.clone())
        .create(CreateLookupEntry {
            name: "Engineering".into(),
            created_by: None,
        })
        .await
        .unwrap();
    let job_position = SurrealLookupRepository::job_position(db.clone())
        .create(CreateLookupEntry {
            name: "Senior Software Engineer".into(),
            created_by: None,
        })
        .await
        .unwrap();
    let nature = SurrealLookupRepository::nature_of_employment(db.clone())
        .create(CreateLookupEntry {
            name: "Full Time".into(),
            created_by: None,
        })
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
            job_position_id: job_position.id,
            created_by: None,
        })
        .await
        .unwrap();
    let hrbp = user_repo
        .create(CreateUser {
            user_code: "RHUB-002".into(),
            name: "Hank Hrbp".into(),
            email: "hank@example.com".into(),
            password: "Temp@Pass1".into(),
            role_id: role.id,
            department_id: department.id,
            job_position_id: job_position.id,
            created_by: None,
        })
        .await
        .unwrap();

    Fixture {
        db,
        job_position_id: job_position.id,
        department_id: department.id,
        nature_id: nature.id,
        recruiter_id: recruiter.id,
        hrbp_id: hrbp.id,
    }
}

impl Fixture {
    fn new_requisition(&self, job_code: &str) -> NewRequisition {
        NewRequisition {
            job_code: job_code.into(),
            job_position_id: self.job_position_id,
            department_id: self.department_id,
            recruiter_id: self.recruiter_id,
            hrbp_id: self.hrbp_id,
            nature_of_employment_id: self.nature_id,
            job_description: Some("Own the billing platform".into()),
            prf_number: None,
            prf_link: None,
            closing_date: None,
            created_by: Some("RHUB-002".into()),
        }
    }
}

#[tokio::test]
async fn create_and_get_requisition() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    let req = repo.create(fx.new_requisition("SSE001")).await.unwrap();

    assert_eq!(req.job_code, "SSE001");
    assert_eq!(req.status, RequisitionStatus::Open);
    assert!(!req.approved_by_hrbp);
    assert!(req.jd_file.is_none());
    assert!(req.lifecycle.is_active());

    let fetched = repo.get_by_id(req.id).await.unwrap();
    assert_eq!(fetched.id, req.id);
    assert_eq!(fetched.recruiter_id, fx.recruiter_id);
    assert_eq!(fetched.hrbp_id, fx.hrbp_id);
}

#[tokio::test]
async fn duplicate_job_code_rejected() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    repo.create(fx.new_requisition("SSE001")).await.unwrap();
    let result = repo.create(fx.new_requisition("SSE001")).await;

    assert!(result.is_err(), "duplicate job code should be rejected");
}

#[tokio::test]
async fn triple_lookup_matches_only_working_statuses() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    assert!(
        repo.find_active_by_triple(fx.job_position_id, fx.department_id, fx.nature_id)
            .await
            .unwrap()
            .is_none()
    );

    let mut req = repo.create(fx.new_requisition("SSE001")).await.unwrap();

    let found = repo
        .find_active_by_triple(fx.job_position_id, fx.department_id, fx.nature_id)
        .await
        .unwrap();
    assert_eq!(found.unwrap().id, req.id);

    // In-progress still blocks the triple.
    req.status = RequisitionStatus::InProgress;
    repo.save(&req).await.unwrap();
    assert!(
        repo.find_active_by_triple(fx.job_position_id, fx.department_id, fx.nature_id)
            .await
            .unwrap()
            .is_some()
    );

    // On-hold does not.
    req.status = RequisitionStatus::OnHold;
    repo.save(&req).await.unwrap();
    assert!(
        repo.find_active_by_triple(fx.job_position_id, fx.department_id, fx.nature_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn triple_lookup_skips_deleted() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    let mut req = repo.create(fx.new_requisition("SSE001")).await.unwrap();
    req.lifecycle = Lifecycle::Deleted;
    req.audit.record_deleted("RHUB-002");
    repo.save(&req).await.unwrap();

    assert!(
        repo.find_active_by_triple(fx.job_position_id, fx.department_id, fx.nature_id)
            .await
            .unwrap()
            .is_none(),
        "deleted requisition should not block the triple"
    );
}

#[tokio::test]
async fn save_round_trips_jd_file() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    let mut req = repo.create(fx.new_requisition("SSE001")).await.unwrap();
    req.jd_file = Some(JdFile {
        file_name: "jd.pdf".into(),
        stored_path: "uploads/abc123.pdf".into(),
        uploaded_at: Utc::now(),
    });
    req.approved_by_hrbp = true;
    req.audit.record_modified("RHUB-002");
    repo.save(&req).await.unwrap();

    let fetched = repo.get_by_id(req.id).await.unwrap();
    let jd = fetched.jd_file.clone().expect("jd file should persist");
    assert_eq!(jd.file_name, "jd.pdf");
    assert_eq!(jd.stored_path, "uploads/abc123.pdf");
    assert!(fetched.approved_by_hrbp);

    // Clearing the attachment persists too.
    let mut fetched = fetched;
    fetched.jd_file = None;
    repo.save(&fetched).await.unwrap();
    assert!(repo.get_by_id(req.id).await.unwrap().jd_file.is_none());
}

#[tokio::test]
async fn list_filters_and_excludes_deleted() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    let mut open = repo.create(fx.new_requisition("SSE001")).await.unwrap();
    let mut second = repo.create(fx.new_requisition("QAE001")).await.unwrap();
    let mut deleted = repo.create(fx.new_requisition("PME001")).await.unwrap();

    open.approved_by_hrbp = true;
    repo.save(&open).await.unwrap();

    second.status = RequisitionStatus::InProgress;
    repo.save(&second).await.unwrap();

    deleted.lifecycle = Lifecycle::Deleted;
    repo.save(&deleted).await.unwrap();

    let all = repo
        .list(
            &RequisitionFilter::default(),
            RequisitionSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 2, "deleted rows are excluded");

    let in_progress = repo
        .list(
            &RequisitionFilter {
                status: Some(RequisitionStatus::InProgress),
                ..Default::default()
            },
            RequisitionSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(in_progress.total, 1);
    assert_eq!(in_progress.items[0].job_code, "QAE001");

    let approved = repo
        .list(
            &RequisitionFilter {
                approved_only: true,
                ..Default::default()
            },
            RequisitionSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(approved.total, 1);
    assert_eq!(approved.items[0].job_code, "SSE001");

    let searched = repo
        .list(
            &RequisitionFilter {
                code_search: Some("qae".into()),
                ..Default::default()
            },
            RequisitionSort::default(),
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(searched.total, 1);
    assert_eq!(searched.items[0].job_code, "QAE001");
}

#[tokio::test]
async fn list_sorts_by_whitelisted_columns() {
    let fx = setup().await;
    let repo = SurrealRequisitionRepository::new(fx.db.clone());

    let mut a = fx.new_requisition("AAA001");
    a.closing_date = Some(Utc::now() + Duration::days(30));
    let mut b = fx.new_requisition("BBB001");
    b.closing_date = Some(Utc::now() + Duration::days(10));
    repo.create(a).await.unwrap();
    repo.create(b).await.unwrap();

    let by_code = repo
        .list(
            &RequisitionFilter::default(),
            RequisitionSort {
                field: RequisitionSortField::JobCode,
                order: SortOrder::Asc,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_code.items[0].job_code, "AAA001");
    assert_eq!(by_code.items[1].job_code, "BBB001");

    let by_closing = repo
        .list(
            &RequisitionFilter::default(),
            RequisitionSort {
                field: RequisitionSortField::ClosingDate,
                order: SortOrder::Asc,
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_closing.items[0].job_code, "BBB001");
}
