//! Adherent API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::core::ServerState;
use crate::store::MensuelleFilter;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::{Adherent, AdherentCreate, AdherentUpdate, CotisationMensuelle};

/// GET /api/adherents - list all members
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Adherent>>> {
    let adherents = state.store.list_adherents().await?;
    Ok(Json(adherents))
}

/// GET /api/adherents/:id - get one member
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Adherent>> {
    let adherent = state
        .store
        .find_adherent(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Adherent {id} not found")))?;
    Ok(Json(adherent))
}

/// POST /api/adherents - create a member
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AdherentCreate>,
) -> AppResult<(StatusCode, Json<Adherent>)> {
    validate_required_text(&payload.nom, "nom", MAX_NAME_LEN)?;
    validate_required_text(&payload.prenom, "prenom", MAX_NAME_LEN)?;

    let adherent = state
        .store
        .create_adherent(Adherent::new(&payload.nom, &payload.prenom))
        .await?;
    Ok((StatusCode::CREATED, Json(adherent)))
}

/// PUT /api/adherents/:id - partial update of a member
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdherentUpdate>,
) -> AppResult<Json<Adherent>> {
    if let Some(nom) = &payload.nom {
        validate_required_text(nom, "nom", MAX_NAME_LEN)?;
    }
    if let Some(prenom) = &payload.prenom {
        validate_required_text(prenom, "prenom", MAX_NAME_LEN)?;
    }

    let adherent = state.store.update_adherent(id, payload).await?;
    Ok(Json(adherent))
}

/// DELETE /api/adherents/:id - delete a member
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<bool>> {
    let deleted = state.store.delete_adherent(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Adherent {id} not found")));
    }
    Ok(Json(true))
}

/// GET /api/adherents/:id/cotisations/:annee - the member's monthly records
/// for one year
pub async fn mensuelles_by_year(
    State(state): State<ServerState>,
    Path((id, annee)): Path<(Uuid, i32)>,
) -> AppResult<Json<Vec<CotisationMensuelle>>> {
    let records = state
        .store
        .list_mensuelles(&MensuelleFilter::for_adherent(id, annee))
        .await?;
    Ok(Json(records))
}
