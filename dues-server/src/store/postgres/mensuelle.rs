//! Cotisation mensuelle queries
//!
//! The twelve monthly amounts are stored in one JSONB column; the derived
//! totals are denormalized columns carried by the record itself (recomputed
//! by the caller on every create/update).

use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use shared::{CotisationMensuelle, Mois};

use crate::store::{MensuelleFilter, StoreError, StoreResult};

const SELECT: &str = "SELECT id, adherent_id, cotisation_id, annee, moyenne_cotisation, mois, \
     total_attendu, total_versee, retard, avance FROM cotisations_mensuelles";

#[derive(sqlx::FromRow)]
struct MensuelleRow {
    id: Uuid,
    adherent_id: Uuid,
    cotisation_id: Uuid,
    annee: i32,
    moyenne_cotisation: f64,
    mois: Json<Mois>,
    total_attendu: f64,
    total_versee: f64,
    retard: f64,
    avance: f64,
}

impl From<MensuelleRow> for CotisationMensuelle {
    fn from(row: MensuelleRow) -> Self {
        Self {
            id: row.id,
            adherent_id: row.adherent_id,
            cotisation_id: row.cotisation_id,
            annee: row.annee,
            moyenne_cotisation: row.moyenne_cotisation,
            mois: row.mois.0,
            total_attendu: row.total_attendu,
            total_versee: row.total_versee,
            retard: row.retard,
            avance: row.avance,
        }
    }
}

pub async fn find_all(
    pool: &PgPool,
    filter: &MensuelleFilter,
) -> StoreResult<Vec<CotisationMensuelle>> {
    // Static SQL with nullable binds; the month filter reads the JSONB key.
    let sql = format!(
        "{SELECT} WHERE ($1::int IS NULL OR annee = $1) \
         AND ($2::uuid IS NULL OR adherent_id = $2) \
         AND ($3::uuid IS NULL OR cotisation_id = $3) \
         AND ($4::text IS NULL OR COALESCE((mois->>$4)::float8, 0) > 0) \
         ORDER BY annee DESC, id"
    );
    let rows = sqlx::query_as::<_, MensuelleRow>(&sql)
        .bind(filter.annee)
        .bind(filter.adherent_id)
        .bind(filter.cotisation_id)
        .bind(filter.mois.map(|m| m.key()))
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<CotisationMensuelle>> {
    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, MensuelleRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

pub async fn create(pool: &PgPool, record: CotisationMensuelle) -> StoreResult<CotisationMensuelle> {
    // Explicit parent checks so the error names the missing reference
    // instead of surfacing a bare FK violation.
    let adherent_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM adherents WHERE id = $1)")
            .bind(record.adherent_id)
            .fetch_one(pool)
            .await?;
    if !adherent_exists {
        return Err(StoreError::InvalidReference(format!(
            "Adherent {} not found",
            record.adherent_id
        )));
    }

    let cotisation_exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM cotisations WHERE id = $1)")
            .bind(record.cotisation_id)
            .fetch_one(pool)
            .await?;
    if !cotisation_exists {
        return Err(StoreError::InvalidReference(format!(
            "Cotisation {} not found",
            record.cotisation_id
        )));
    }

    sqlx::query(
        "INSERT INTO cotisations_mensuelles \
         (id, adherent_id, cotisation_id, annee, moyenne_cotisation, mois, \
          total_attendu, total_versee, retard, avance) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(record.id)
    .bind(record.adherent_id)
    .bind(record.cotisation_id)
    .bind(record.annee)
    .bind(record.moyenne_cotisation)
    .bind(Json(record.mois))
    .bind(record.total_attendu)
    .bind(record.total_versee)
    .bind(record.retard)
    .bind(record.avance)
    .execute(pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(format!(
            "A monthly record already exists for this adherent/cotisation/year ({})",
            record.annee
        )),
        _ => e.into(),
    })?;

    Ok(record)
}

pub async fn save(pool: &PgPool, record: CotisationMensuelle) -> StoreResult<CotisationMensuelle> {
    let rows = sqlx::query(
        "UPDATE cotisations_mensuelles SET moyenne_cotisation = $1, mois = $2, \
         total_attendu = $3, total_versee = $4, retard = $5, avance = $6 WHERE id = $7",
    )
    .bind(record.moyenne_cotisation)
    .bind(Json(record.mois))
    .bind(record.total_attendu)
    .bind(record.total_versee)
    .bind(record.retard)
    .bind(record.avance)
    .bind(record.id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(StoreError::NotFound(format!(
            "Cotisation mensuelle {} not found",
            record.id
        )));
    }
    Ok(record)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM cotisations_mensuelles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
