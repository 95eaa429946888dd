//! Unified error handling
//!
//! # Error codes
//!
//! | Code | Status | Category |
//! |------|--------|----------|
//! | E0002 | 400 | Validation (missing/invalid input) |
//! | E0005 | 400 | Invalid data (business-rule validation, with details) |
//! | E0003 | 404 | Not found |
//! | E0004 | 409 | Conflict (duplicate unique key) |
//! | E9002 | 500 | Database error (detail logged server-side only) |
//! | E9001 | 500 | Internal error (detail logged server-side only) |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::store::StoreError;
use shared::ValidationError;

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or invalid input (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Business-rule validation failure with per-rule messages (400)
    #[error("Invalid data: {0}")]
    InvalidData(#[from] ValidationError),

    /// Unknown identifier (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Duplicate unique key (409)
    #[error("Resource already exists: {0}")]
    Conflict(String),

    /// Persistence failure (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg, None),

            AppError::InvalidData(err) => (
                StatusCode::BAD_REQUEST,
                "E0005",
                "Invalid data".to_string(),
                Some(err.errors),
            ),

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg, None),

            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg, None),

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    None,
                )
            }

            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            code,
            message,
            details,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::InvalidReference(msg) => AppError::Validation(msg),
            StoreError::Invalid(err) => AppError::InvalidData(err),
            StoreError::Storage(msg) => AppError::Database(msg),
        }
    }
}
