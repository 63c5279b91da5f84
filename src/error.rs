use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

/// Application-level error taxonomy. Internal causes carry their detail so
/// they can be logged server-side; the wire body only ever exposes the
/// coarse message the client contract promises.
#[derive(Debug)]
pub enum AppError {
    Unauthorized(String),
    MissingFile,
    InvalidMetadata(String),
    Configuration(String),
    UploadFailed(String),
    Persistence(sea_orm::DbErr),
    Query(sea_orm::DbErr),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::MissingFile => (StatusCode::BAD_REQUEST, "File not found!".to_string()),
            AppError::InvalidMetadata(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Configuration(detail) => {
                tracing::error!(%detail, "upload rejected: gateway not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upload image failed!".to_string(),
                )
            }
            AppError::UploadFailed(detail) => {
                tracing::error!(%detail, "gateway upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upload image failed!".to_string(),
                )
            }
            AppError::Persistence(err) => {
                tracing::error!(error = %err, "failed to persist media record");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upload image failed!".to_string(),
                )
            }
            AppError::Query(err) => {
                tracing::error!(error = %err, "failed to fetch videos");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error fetching videos".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!(%msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
