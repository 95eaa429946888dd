use std::sync::Arc;

use crate::core::Config;
use crate::store::{JsonFileStore, PostgresStore, Store};
use crate::utils::{AppError, AppResult};

/// Shared server state: configuration plus the storage backend behind the
/// common [`Store`] contract. Cloning is shallow (`Arc`).
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Storage backend selected at startup
    pub store: Arc<dyn Store>,
}

impl ServerState {
    /// Build a state around an already-constructed store (used by tests).
    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }

    /// Initialize the state, selecting the storage backend:
    ///
    /// - `DATABASE_URL` set → PostgreSQL (pool + migrations),
    /// - otherwise → JSON documents under `config.data_dir`.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => {
                let store = PostgresStore::connect(url)
                    .await
                    .map_err(|e| AppError::database(e.to_string()))?;
                tracing::info!("Storage backend: PostgreSQL");
                Arc::new(store)
            }
            None => {
                let store = JsonFileStore::new(&config.data_dir)
                    .map_err(|e| AppError::internal(e.to_string()))?;
                tracing::warn!(
                    data_dir = %config.data_dir,
                    "DATABASE_URL not set, falling back to JSON file storage"
                );
                Arc::new(store)
            }
        };

        Ok(Self::with_store(config.clone(), store))
    }
}
