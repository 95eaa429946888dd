//! Cotisation API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::core::ServerState;
use crate::store::MensuelleFilter;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::{Cotisation, CotisationCreate, CotisationMensuelle, CotisationUpdate};

/// GET /api/cotisations - list all due types
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Cotisation>>> {
    let cotisations = state.store.list_cotisations().await?;
    Ok(Json(cotisations))
}

/// GET /api/cotisations/:id - get one due type
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Cotisation>> {
    let cotisation = state
        .store
        .find_cotisation(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cotisation {id} not found")))?;
    Ok(Json(cotisation))
}

/// POST /api/cotisations - create a due type (unique name)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CotisationCreate>,
) -> AppResult<(StatusCode, Json<Cotisation>)> {
    validate_required_text(&payload.nom, "nom", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let cotisation = state
        .store
        .create_cotisation(Cotisation::new(&payload.nom, payload.description.as_deref()))
        .await?;
    Ok((StatusCode::CREATED, Json(cotisation)))
}

/// PUT /api/cotisations/:id - partial update of a due type
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CotisationUpdate>,
) -> AppResult<Json<Cotisation>> {
    if let Some(nom) = &payload.nom {
        validate_required_text(nom, "nom", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let cotisation = state.store.update_cotisation(id, payload).await?;
    Ok(Json(cotisation))
}

/// DELETE /api/cotisations/:id - delete a due type
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<bool>> {
    let deleted = state.store.delete_cotisation(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Cotisation {id} not found")));
    }
    Ok(Json(true))
}

/// GET /api/cotisations/:id/mensuelles/:annee - the due type's monthly
/// records for one year
pub async fn mensuelles_by_year(
    State(state): State<ServerState>,
    Path((id, annee)): Path<(Uuid, i32)>,
) -> AppResult<Json<Vec<CotisationMensuelle>>> {
    let records = state
        .store
        .list_mensuelles(&MensuelleFilter::for_cotisation(id, annee))
        .await?;
    Ok(Json(records))
}
