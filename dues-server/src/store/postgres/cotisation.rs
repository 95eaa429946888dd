//! Cotisation queries

use sqlx::PgPool;
use uuid::Uuid;

use shared::{Cotisation, CotisationUpdate};

use crate::store::{StoreError, StoreResult};

const SELECT: &str = "SELECT id, nom, description, date_creation, actif FROM cotisations";

pub async fn find_all(pool: &PgPool) -> StoreResult<Vec<Cotisation>> {
    let sql = format!("{SELECT} ORDER BY nom");
    let rows = sqlx::query_as::<_, Cotisation>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> StoreResult<Option<Cotisation>> {
    let sql = format!("{SELECT} WHERE id = $1");
    let row = sqlx::query_as::<_, Cotisation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, cotisation: Cotisation) -> StoreResult<Cotisation> {
    sqlx::query(
        "INSERT INTO cotisations (id, nom, description, date_creation, actif) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(cotisation.id)
    .bind(&cotisation.nom)
    .bind(&cotisation.description)
    .bind(cotisation.date_creation)
    .bind(cotisation.actif)
    .execute(pool)
    .await
    .map_err(|e| duplicate_name(e, &cotisation.nom))?;
    Ok(cotisation)
}

pub async fn update(pool: &PgPool, id: Uuid, patch: CotisationUpdate) -> StoreResult<Cotisation> {
    let nom = patch.nom.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE cotisations SET nom = COALESCE($1, nom), description = COALESCE($2, description), actif = COALESCE($3, actif) WHERE id = $4",
    )
    .bind(nom)
    .bind(patch.description.as_deref().map(str::trim))
    .bind(patch.actif)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| duplicate_name(e, nom.unwrap_or_default()))?;
    if rows.rows_affected() == 0 {
        return Err(StoreError::NotFound(format!("Cotisation {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Cotisation {id} not found")))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM cotisations WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                StoreError::InvalidReference(format!("Cotisation {id} still has monthly records"))
            }
            _ => e.into(),
        })?;
    Ok(result.rows_affected() > 0)
}

fn duplicate_name(err: sqlx::Error, nom: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(format!("Cotisation '{nom}' already exists"))
        }
        _ => err.into(),
    }
}
