//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check and API index
//! - [`adherents`] - member management endpoints
//! - [`cotisations`] - due-type management endpoints
//! - [`cotisations_mensuelles`] - monthly payment record endpoints
//! - [`export`] - CSV report downloads

pub mod adherents;
pub mod cotisations;
pub mod cotisations_mensuelles;
pub mod export;
pub mod health;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(adherents::router())
        .merge(cotisations::router())
        .merge(cotisations_mensuelles::router())
        .merge(export::router())
        .merge(health::router())
}

/// Build the fully configured application with middleware and state applied.
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - the frontend runs on a different origin
        .layer(CorsLayer::permissive())
        // Gzip compress responses
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Generate a unique ID for each request and echo it back
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
