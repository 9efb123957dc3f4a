use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Error taxonomy shared by every handler.
///
/// Duplicate names and in-use categories answer 400 rather than 409; the
/// API has always reported conflicts that way and the client relies on it.
/// Ownership and lifecycle failures are a uniform 404 so a caller cannot
/// probe whether a row exists under another account.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct FailBody {
    status: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ValidationBody {
    status: &'static str,
    errors: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody {
                    status: "fail",
                    errors,
                }),
            )
                .into_response(),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(FailBody {
                    status: "fail",
                    message,
                }),
            )
                .into_response(),
            ApiError::Conflict(message) => (
                StatusCode::BAD_REQUEST,
                Json(FailBody {
                    status: "fail",
                    message,
                }),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(FailBody {
                    status: "fail",
                    message,
                }),
            )
                .into_response(),
            ApiError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(FailBody {
                        status: "error",
                        message: e.to_string(),
                    }),
                )
                    .into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(FailBody {
                        status: "error",
                        message: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
