//! Cotisation Mensuelle API Handlers
//!
//! Derived totals are never accepted from clients: the record is rebuilt
//! (or patched and recomputed) server-side, then checked against the
//! accounting identity before it is persisted.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::ServerState;
use crate::store::MensuelleFilter;
use crate::utils::{AppError, AppResult};
use shared::calculations;
use shared::{CotisationMensuelle, CotisationMensuelleCreate, CotisationMensuelleUpdate, Month};

/// Query string filters for the list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    pub annee: Option<i32>,
    pub adherent_id: Option<Uuid>,
    pub cotisation_id: Option<Uuid>,
    pub mois: Option<Month>,
}

impl From<ListQuery> for MensuelleFilter {
    fn from(query: ListQuery) -> Self {
        MensuelleFilter {
            annee: query.annee,
            adherent_id: query.adherent_id,
            cotisation_id: query.cotisation_id,
            mois: query.mois,
        }
    }
}

/// GET /api/cotisations-mensuelles - list monthly records, optionally
/// filtered by year, member, due type or a paid month
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<CotisationMensuelle>>> {
    let records = state.store.list_mensuelles(&query.into()).await?;
    Ok(Json(records))
}

/// GET /api/cotisations-mensuelles/:id - get one monthly record
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CotisationMensuelle>> {
    let record = state
        .store
        .find_mensuelle(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cotisation mensuelle {id} not found")))?;
    Ok(Json(record))
}

/// POST /api/cotisations-mensuelles - create a monthly record
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CotisationMensuelleCreate>,
) -> AppResult<(StatusCode, Json<CotisationMensuelle>)> {
    if payload.moyenne_cotisation <= 0.0 {
        return Err(AppError::validation(
            "moyenneCotisation must be a positive amount",
        ));
    }

    let record = CotisationMensuelle::new(
        payload.adherent_id,
        payload.cotisation_id,
        payload.annee,
        payload.moyenne_cotisation,
        payload.mois,
    );
    calculations::validate(&record)?;

    let record = state.store.create_mensuelle(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/cotisations-mensuelles/:id - patch the average and/or months;
/// totals are recomputed before the record is saved
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CotisationMensuelleUpdate>,
) -> AppResult<Json<CotisationMensuelle>> {
    if let Some(moyenne) = payload.moyenne_cotisation
        && moyenne <= 0.0
    {
        return Err(AppError::validation(
            "moyenneCotisation must be a positive amount",
        ));
    }

    let mut record = state
        .store
        .find_mensuelle(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cotisation mensuelle {id} not found")))?;
    record.apply_update(&payload);
    calculations::validate(&record)?;

    let record = state.store.save_mensuelle(record).await?;
    Ok(Json(record))
}

/// DELETE /api/cotisations-mensuelles/:id - delete a monthly record
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<bool>> {
    let deleted = state.store.delete_mensuelle(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!(
            "Cotisation mensuelle {id} not found"
        )));
    }
    Ok(Json(true))
}
