use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client input that cannot be normalized into generation parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The tile list parsed but apportioned to nothing placeable.
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// The raster could not be serialized. Reported with the client-error
    /// status the service has always used; the distinct code keeps it apart.
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Allocation(msg) => (StatusCode::BAD_REQUEST, "ALLOCATION_ERROR", msg.clone()),
            AppError::Encoding(msg) => {
                tracing::error!("Encoding error: {msg}");
                (StatusCode::BAD_REQUEST, "ENCODING_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
