//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::crypto::CryptoError;
use crate::db::DatabaseError;

/// Failure envelope: `{ success: false, message, error }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Invalid email or password")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{message}: {detail}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn internal(message: &'static str, detail: impl ToString) -> Self {
        ApiError::Internal {
            message,
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, error) = match self {
            ApiError::BadRequest(detail) => ("Invalid request".to_string(), detail),
            ApiError::Unauthorized => (
                "Invalid email or password".to_string(),
                "invalid credentials".to_string(),
            ),
            ApiError::Conflict(detail) => ("Resource already exists".to_string(), detail),
            ApiError::Internal { message, detail } => {
                tracing::error!(%detail, "{message}");
                (message.to_string(), detail)
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            error,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateKey { .. } => ApiError::Conflict(err.to_string()),
            other => ApiError::internal("Server error", other),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        ApiError::internal("Server error", err)
    }
}
