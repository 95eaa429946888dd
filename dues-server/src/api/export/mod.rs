//! CSV export API module

mod csv;
mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/export", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/adherent/{id}/{annee}", get(handler::export_adherent))
        .route("/cotisation/{id}/{annee}", get(handler::export_cotisation))
}
