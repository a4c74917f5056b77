// Application state: environment, inference backends, triage store.

use std::sync::Arc;

use crate::backends::Backends;
use crate::config::environment::EnvironmentVariables;
use crate::database::DatabaseService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub environment: Arc<EnvironmentVariables>,
    pub backends: Backends,
    pub database: DatabaseService,
}

impl AppState {
    /// Builds the state from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::with_environment(EnvironmentVariables::load()?)
    }

    /// Builds the state from an explicit configuration. Tests use this
    /// to point the backend clients at stub servers.
    pub fn with_environment(environment: EnvironmentVariables) -> anyhow::Result<Self> {
        let environment: Arc<EnvironmentVariables> = Arc::new(environment);

        let backends: Backends = Backends::from_environment(&environment)?;
        let database: DatabaseService = DatabaseService::new(environment.clone());

        Ok(Self {
            environment,
            backends,
            database,
        })
    }

    /// Gracefully closes all database connections.
    pub async fn shutdown(&self) {
        self.database.shutdown().await;
    }
}
