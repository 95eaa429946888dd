//! Adherent queries

use sqlx::PgPool;
use uuid::Uuid;

use shared::{Adherent, AdherentUpdate};

use crate::store::{StoreError, StoreResult};

const SELECT: &str = "SELECT id, nom, prenom, date_creation, actif FROM adherents";

pub async fn find_all(pool: &PgPool) -> StoreResult<Vec<Adherent>> {
    let sql = format!("{SELECT} ORDER BY date_creation");
    let rows = sqlx::query_as::<_, Adherent>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<Adherent>> {
    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, Adherent>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, adherent: Adherent) -> StoreResult<Adherent> {
    sqlx::query(
        "INSERT INTO adherents (id, nom, prenom, date_creation, actif) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(adherent.id)
    .bind(&adherent.nom)
    .bind(&adherent.prenom)
    .bind(adherent.date_creation)
    .bind(adherent.actif)
    .execute(pool)
    .await?;
    Ok(adherent)
}

pub async fn update(pool: &PgPool, id: Uuid, patch: AdherentUpdate) -> StoreResult<Adherent> {
    let rows = sqlx::query(
        "UPDATE adherents SET nom = COALESCE($1, nom), prenom = COALESCE($2, prenom), actif = COALESCE($3, actif) WHERE id = $4",
    )
    .bind(patch.nom.as_deref().map(str::trim))
    .bind(patch.prenom.as_deref().map(str::trim))
    .bind(patch.actif)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(StoreError::NotFound(format!("Adherent {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Adherent {id} not found")))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM adherents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::InvalidReference(format!("Adherent {id} still has monthly records"))
            }
            _ => e.into(),
        })?;
    Ok(result.rows_affected() > 0)
}
