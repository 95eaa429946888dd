//! Health check and API index routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | / | GET | API index (name, version, endpoint map) |
//! | /api/health | GET | Static status JSON with timestamp |

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;

use crate::core::ServerState;

/// Health routes - public, no state mutation
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Status (OK | error)
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Dues management API",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// API index response
#[derive(Serialize)]
pub struct IndexResponse {
    message: &'static str,
    version: &'static str,
    environment: String,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Endpoints {
    health: &'static str,
    adherents: &'static str,
    cotisations: &'static str,
    cotisations_mensuelles: &'static str,
    export: &'static str,
}

async fn index(State(state): State<ServerState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "Dues management API",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        endpoints: Endpoints {
            health: "/api/health",
            adherents: "/api/adherents",
            cotisations: "/api/cotisations",
            cotisations_mensuelles: "/api/cotisations-mensuelles",
            export: "/api/export",
        },
    })
}
