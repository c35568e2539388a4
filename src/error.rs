use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Rejected weight input. Nothing is persisted when this is returned.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("weight is required")]
    Missing,
    #[error("weight `{0}` is not a number")]
    NotANumber(String),
    #[error("weight must be a finite number")]
    NotFinite,
    #[error("weight {0} lbs is outside the accepted range (above 0, at most 1500 lbs)")]
    OutOfRange(f64),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("user {0} does not exist")]
    UnknownUser(Uuid),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Error rendered as `{"error": ..., "details": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

impl ApiError {
    /// Generic failure without details; used where the cause is not shown to clients.
    pub fn opaque(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: None,
        }
    }

    /// Request that could not be read at all.
    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// Failure carrying the underlying message, with a status derived from its kind.
    pub fn detailed(error: impl Into<String>, cause: AppError) -> Self {
        let status = match &cause {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(StorageError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            AppError::Storage(StorageError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            error: error.into(),
            details: Some(cause.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.error,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
