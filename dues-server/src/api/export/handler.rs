//! CSV export handlers

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::csv;
use crate::core::ServerState;
use crate::store::MensuelleFilter;
use crate::utils::{AppError, AppResult};

/// A generated CSV document served as a file download.
struct CsvAttachment {
    filename: String,
    content: String,
}

impl IntoResponse for CsvAttachment {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.content,
        )
            .into_response()
    }
}

/// Make a name safe for a Content-Disposition filename: whitespace becomes
/// `_` and anything outside printable ASCII is dropped.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_graphic() && c != '"' && c != '\\' {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// GET /api/export/adherent/:id/:annee - one member's yearly report
pub async fn export_adherent(
    State(state): State<ServerState>,
    Path((id, annee)): Path<(Uuid, i32)>,
) -> AppResult<impl IntoResponse> {
    let adherent = state
        .store
        .find_adherent(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Adherent {id} not found")))?;

    let records = state
        .store
        .list_mensuelles(&MensuelleFilter::for_adherent(id, annee))
        .await?;

    // Rows carry the due type name, ordered by it.
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let nom = match state.store.find_cotisation(record.cotisation_id).await? {
            Some(cotisation) => cotisation.nom,
            None => "Cotisation inconnue".to_owned(),
        };
        rows.push((nom, record));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(CsvAttachment {
        filename: format!(
            "adherent_{}_{}_{}.csv",
            sanitize_filename(&adherent.prenom),
            sanitize_filename(&adherent.nom),
            annee
        ),
        content: csv::adherent_csv(&adherent, annee, &rows),
    })
}

/// GET /api/export/cotisation/:id/:annee - one due type's yearly report
pub async fn export_cotisation(
    State(state): State<ServerState>,
    Path((id, annee)): Path<(Uuid, i32)>,
) -> AppResult<impl IntoResponse> {
    let cotisation = state
        .store
        .find_cotisation(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Cotisation {id} not found")))?;

    let records = state
        .store
        .list_mensuelles(&MensuelleFilter::for_cotisation(id, annee))
        .await?;

    // Rows carry the member display name, ordered by it.
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let nom = match state.store.find_adherent(record.adherent_id).await? {
            Some(adherent) => format!("{} {}", adherent.prenom, adherent.nom),
            None => "Adhérent inconnu".to_owned(),
        };
        rows.push((nom, record));
    }
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(CsvAttachment {
        filename: format!(
            "Cotisations_{}_-_Annee_{}.csv",
            sanitize_filename(&cotisation.nom),
            annee
        ),
        content: csv::cotisation_csv(&cotisation, annee, &rows),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_strip_spaces_and_accents() {
        assert_eq!(sanitize_filename("Caisse commune"), "Caisse_commune");
        assert_eq!(sanitize_filename("Aïcha"), "Acha");
        assert_eq!(sanitize_filename("Durand"), "Durand");
    }
}
