//! PostgreSQL storage backend
//!
//! Owns the connection pool and runs the embedded migrations at startup.
//! Entity queries live in one submodule per table, as free functions over
//! the pool.

mod adherent;
mod cotisation;
mod mensuelle;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use shared::{Adherent, AdherentUpdate, Cotisation, CotisationMensuelle, CotisationUpdate};

use super::{MensuelleFilter, Store, StoreError, StoreResult};

/// Relational store — owns a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the database and apply pending migrations.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to connect to PostgreSQL: {e}")))?;

        tracing::info!("PostgreSQL connection established");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_adherents(&self) -> StoreResult<Vec<Adherent>> {
        adherent::find_all(&self.pool).await
    }

    async fn find_adherent(&self, id: Uuid) -> StoreResult<Option<Adherent>> {
        adherent::find_by_id(&self.pool, id).await
    }

    async fn create_adherent(&self, adherent: Adherent) -> StoreResult<Adherent> {
        adherent::create(&self.pool, adherent).await
    }

    async fn update_adherent(&self, id: Uuid, patch: AdherentUpdate) -> StoreResult<Adherent> {
        adherent::update(&self.pool, id, patch).await
    }

    async fn delete_adherent(&self, id: Uuid) -> StoreResult<bool> {
        adherent::delete(&self.pool, id).await
    }

    async fn list_cotisations(&self) -> StoreResult<Vec<Cotisation>> {
        cotisation::find_all(&self.pool).await
    }

    async fn find_cotisation(&self, id: Uuid) -> StoreResult<Option<Cotisation>> {
        cotisation::find_by_id(&self.pool, id).await
    }

    async fn create_cotisation(&self, cotisation: Cotisation) -> StoreResult<Cotisation> {
        cotisation::create(&self.pool, cotisation).await
    }

    async fn update_cotisation(
        &self,
        id: Uuid,
        patch: CotisationUpdate,
    ) -> StoreResult<Cotisation> {
        cotisation::update(&self.pool, id, patch).await
    }

    async fn delete_cotisation(&self, id: Uuid) -> StoreResult<bool> {
        cotisation::delete(&self.pool, id).await
    }

    async fn list_mensuelles(
        &self,
        filter: &MensuelleFilter,
    ) -> StoreResult<Vec<CotisationMensuelle>> {
        mensuelle::find_all(&self.pool, filter).await
    }

    async fn find_mensuelle(&self, id: Uuid) -> StoreResult<Option<CotisationMensuelle>> {
        mensuelle::find_by_id(&self.pool, id).await
    }

    async fn create_mensuelle(
        &self,
        record: CotisationMensuelle,
    ) -> StoreResult<CotisationMensuelle> {
        mensuelle::create(&self.pool, record).await
    }

    async fn save_mensuelle(
        &self,
        record: CotisationMensuelle,
    ) -> StoreResult<CotisationMensuelle> {
        mensuelle::save(&self.pool, record).await
    }

    async fn delete_mensuelle(&self, id: Uuid) -> StoreResult<bool> {
        mensuelle::delete(&self.pool, id).await
    }
}
