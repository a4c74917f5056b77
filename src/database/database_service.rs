// Database service managing the MySQL connection pool for triage
// records. The pool is created lazily so backend-only routes never
// require a reachable database.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{ConnectOptions, MySqlPool};
use tokio::sync::OnceCell;
use tracing::{debug, info, log::LevelFilter};

use crate::config::environment::EnvironmentVariables;

const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Structured triage summaries produced by MedReason land here.
/// `medical_reasoning` from the model output is deliberately absent.
const CREATE_TRIAGE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS triage (
    id BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
    patient_name VARCHAR(255) NOT NULL,
    date_of_birth DATE NULL,
    visit_time DATETIME NULL,
    severity VARCHAR(32) NULL,
    primary_diagnosis TEXT NULL,
    secondary_diagnoses TEXT NULL,
    recommended_tests TEXT NULL,
    recommended_treatment TEXT NULL,
    follow_up TEXT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

#[derive(Clone, Debug)]
pub struct DatabaseService {
    /// Single connection pool, initialized on first use
    pool: Arc<OnceCell<MySqlPool>>,
    /// Environment configuration
    config: Arc<EnvironmentVariables>,
}

impl DatabaseService {
    /// Creates a new DatabaseService instance.
    /// Note: The pool is not created until `pool()` is first called.
    pub fn new(config: Arc<EnvironmentVariables>) -> Self {
        Self {
            pool: Arc::new(OnceCell::new()),
            config,
        }
    }

    /// Returns the connection pool, creating it and applying the
    /// schema on first use.
    pub async fn pool(&self) -> Result<&MySqlPool> {
        self.pool
            .get_or_try_init(|| async {
                let pool: MySqlPool = self.create_pool().await?;
                self.initialize_schema(&pool).await?;
                Ok(pool)
            })
            .await
    }

    /// Eagerly warms up the pool. Used at startup so connection
    /// problems surface in the logs before the first triage write.
    pub async fn initialize(&self) -> Result<()> {
        info!("Initializing DatabaseService...");
        self.pool().await?;
        info!("DatabaseService initialized successfully");
        Ok(())
    }

    /// Gracefully shuts down the service.
    pub async fn shutdown(&self) {
        info!("Initiating DatabaseService shutdown...");
        if let Some(pool) = self.pool.get() {
            pool.close().await;
            info!("Database connection pool closed");
        } else {
            debug!("Database pool was not initialized, nothing to close");
        }
    }

    async fn create_pool(&self) -> Result<MySqlPool> {
        info!(
            "Connecting to MySQL at {}:{}/{}",
            self.config.db_host, self.config.db_port, self.config.db_name
        );

        let options: MySqlConnectOptions = MySqlConnectOptions::new()
            .host(&self.config.db_host)
            .port(self.config.db_port)
            .username(&self.config.db_user)
            .password(&self.config.db_password)
            .database(&self.config.db_name)
            .log_statements(LevelFilter::Debug);

        MySqlPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .context("Failed to connect to MySQL")
    }

    async fn initialize_schema(&self, pool: &MySqlPool) -> Result<()> {
        sqlx::query(CREATE_TRIAGE_TABLE_SQL)
            .execute(pool)
            .await
            .context("Failed to create triage table")?;

        Ok(())
    }
}
