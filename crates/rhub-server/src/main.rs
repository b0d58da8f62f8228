//! RHub Server — application entry point.

use rhub_core::error::RhubError;
use rhub_core::repository::RoleRepository;
use rhub_db::repository::SurrealRoleRepository;
use rhub_db::{DbConfig, DbManager};
use surrealdb::Connection;
use surrealdb::Surreal;
use tracing_subscriber::EnvFilter;

/// Role names expected by the workflow engine.
const SEED_ROLES: [&str; 3] = ["Admin", "HRBP", "Recruiter"];

/// Create any missing seed roles. Idempotent across restarts.
async fn seed_roles<C: Connection>(db: &Surreal<C>) -> Result<(), RhubError> {
    let roles = SurrealRoleRepository::new(db.clone());
    for name in SEED_ROLES {
        match roles.get_by_name(name).await {
            Ok(_) => {}
            Err(RhubError::NotFound { .. }) => {
                roles.create(name).await?;
                tracing::info!(role = name, "Seeded role");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rhub=info".parse().unwrap()))
        .json()
        .init();

    tracing::info!("Starting RHub server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = rhub_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Migrations failed");
        std::process::exit(1);
    }
    if let Err(e) = seed_roles(manager.client()).await {
        tracing::error!(error = %e, "Role seeding failed");
        std::process::exit(1);
    }

    // TODO: mount the REST layer over RequisitionService, UserService,
    // and LookupService once the HTTP surface is settled.

    tracing::info!("RHub server stopped.");
}
