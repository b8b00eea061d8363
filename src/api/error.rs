// ==========================================
// Depot Management - API errors
// ==========================================
// Maps lower-layer errors onto HTTP responses:
// not found -> 404, invalid input -> 400, everything else -> 500
// ==========================================

use crate::domain::ValidationError;
use crate::repository::error::RepositoryError;
use crate::service::FormError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation timed out: {0}")]
    Timeout(String),

    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("export failed: {0}")]
    ExportError(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::DatabaseError(_) | ApiError::ExportError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Timeout { .. } => ApiError::Timeout(err.to_string()),
            RepositoryError::TaskJoin(msg) => ApiError::InternalError(msg),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Validation(e) => e.into(),
            FormError::Repository(e) => e.into(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for ApiError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Not-found bodies are the bare message
            ApiError::NotFound(message) => (status, message).into_response(),
            ApiError::InvalidInput(message) => {
                (status, Json(json!({ "error": message }))).into_response()
            }
            other => {
                tracing::error!(error = %other, status = %status, "request failed");
                (status, Json(json!({ "error": other.to_string() }))).into_response()
            }
        }
    }
}
