//! SurrealDB connection management.
//!
//! The server connects over WebSocket with root credentials; tests
//! bypass this module entirely and run against the in-memory engine.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

/// Connection settings, overridable through `RHUB_DB_*` environment
/// variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket address, e.g. `127.0.0.1:8000`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "rhub".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Read the configuration from `RHUB_DB_URL`, `RHUB_DB_NAMESPACE`,
    /// `RHUB_DB_DATABASE`, `RHUB_DB_USERNAME`, and `RHUB_DB_PASSWORD`,
    /// falling back to the defaults for any unset variable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str, default: String| std::env::var(name).unwrap_or(default);
        Self {
            url: var("RHUB_DB_URL", defaults.url),
            namespace: var("RHUB_DB_NAMESPACE", defaults.namespace),
            database: var("RHUB_DB_DATABASE", defaults.database),
            username: var("RHUB_DB_USERNAME", defaults.username),
            password: var("RHUB_DB_PASSWORD", defaults.password),
        }
    }
}

/// An established, namespace-selected SurrealDB session.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open the WebSocket connection, sign in as root, and select the
    /// configured namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Connected to SurrealDB");
        Ok(Self { db })
    }

    /// The underlying client, handed to repositories and migrations.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}
