//! Storage layer
//!
//! A single [`Store`] contract with two backends, selected once at startup:
//!
//! - [`PostgresStore`]: three relational tables, constraints enforced by the
//!   database (unique cotisation name, unique (adherent, cotisation, annee)
//!   triple, foreign keys).
//! - [`JsonFileStore`]: three flat JSON documents with whole-file
//!   read/modify/write, constraints enforced manually.
//!
//! Monthly-record mutations always carry fully recomputed totals; the stores
//! persist what they are given and only enforce identity/uniqueness rules.

pub mod jsonfile;
pub mod postgres;

pub use jsonfile::JsonFileStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared::{
    Adherent, AdherentUpdate, Cotisation, CotisationMensuelle, CotisationUpdate, Month,
    ValidationError,
};

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid data: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Filter for listing monthly records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MensuelleFilter {
    pub annee: Option<i32>,
    pub adherent_id: Option<Uuid>,
    pub cotisation_id: Option<Uuid>,
    /// Keep only records with a non-zero amount in this month.
    pub mois: Option<Month>,
}

impl MensuelleFilter {
    /// Records of one adherent for one year.
    pub fn for_adherent(adherent_id: Uuid, annee: i32) -> Self {
        Self {
            adherent_id: Some(adherent_id),
            annee: Some(annee),
            ..Default::default()
        }
    }

    /// Records of one cotisation for one year.
    pub fn for_cotisation(cotisation_id: Uuid, annee: i32) -> Self {
        Self {
            cotisation_id: Some(cotisation_id),
            annee: Some(annee),
            ..Default::default()
        }
    }
}

/// Common storage contract: list/get/create/update/delete per entity.
///
/// `delete_*` returns whether a record was actually removed; the API layer
/// turns `false` into a 404.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Adherents ───────────────────────────────────────────────────
    async fn list_adherents(&self) -> StoreResult<Vec<Adherent>>;
    async fn find_adherent(&self, id: Uuid) -> StoreResult<Option<Adherent>>;
    async fn create_adherent(&self, adherent: Adherent) -> StoreResult<Adherent>;
    async fn update_adherent(&self, id: Uuid, patch: AdherentUpdate) -> StoreResult<Adherent>;
    async fn delete_adherent(&self, id: Uuid) -> StoreResult<bool>;

    // ── Cotisations ─────────────────────────────────────────────────
    async fn list_cotisations(&self) -> StoreResult<Vec<Cotisation>>;
    async fn find_cotisation(&self, id: Uuid) -> StoreResult<Option<Cotisation>>;
    async fn create_cotisation(&self, cotisation: Cotisation) -> StoreResult<Cotisation>;
    async fn update_cotisation(&self, id: Uuid, patch: CotisationUpdate) -> StoreResult<Cotisation>;
    async fn delete_cotisation(&self, id: Uuid) -> StoreResult<bool>;

    // ── Cotisations mensuelles ──────────────────────────────────────
    async fn list_mensuelles(
        &self,
        filter: &MensuelleFilter,
    ) -> StoreResult<Vec<CotisationMensuelle>>;
    async fn find_mensuelle(&self, id: Uuid) -> StoreResult<Option<CotisationMensuelle>>;
    /// Checks that both referenced parents exist and that no record already
    /// exists for the (adherent, cotisation, annee) triple.
    async fn create_mensuelle(
        &self,
        record: CotisationMensuelle,
    ) -> StoreResult<CotisationMensuelle>;
    /// Persist an updated record (same id); fails with `NotFound` if gone.
    async fn save_mensuelle(&self, record: CotisationMensuelle)
    -> StoreResult<CotisationMensuelle>;
    async fn delete_mensuelle(&self, id: Uuid) -> StoreResult<bool>;
}
