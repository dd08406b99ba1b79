use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::service::LicenseError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Duplicate key on create. Answers in the create response shape
    /// `{created: false, error}` rather than the generic error body.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unreadable body: {0}")]
    Body(#[from] BytesRejection),

    #[error("Invalid query: {0}")]
    Query(#[from] QueryRejection),
}

#[derive(Serialize)]
struct ConflictResponse {
    created: bool,
    error: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<LicenseError> for AppError {
    fn from(err: LicenseError) -> Self {
        match err {
            LicenseError::Unauthorized => AppError::Unauthorized,
            LicenseError::KeyExists => AppError::Conflict(err.to_string()),
            LicenseError::InvalidKey(msg) => AppError::BadRequest(msg),
            LicenseError::Storage(e) => AppError::Storage(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            AppError::Conflict(msg) => {
                let body = ConflictResponse {
                    created: false,
                    error: msg,
                };
                return (StatusCode::CONFLICT, Json(body)).into_response();
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad request", Some(msg)),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized", None),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            AppError::Json(e) => {
                tracing::debug!("Rejected JSON body: {}", e);
                (StatusCode::BAD_REQUEST, "Invalid JSON", Some(e.to_string()))
            }
            AppError::Body(e) => {
                tracing::debug!("Rejected request body: {}", e);
                (e.status(), "Bad request", Some(e.body_text()))
            }
            AppError::Query(e) => {
                tracing::debug!("Rejected query string: {}", e);
                (StatusCode::BAD_REQUEST, "Invalid query", Some(e.body_text()))
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
