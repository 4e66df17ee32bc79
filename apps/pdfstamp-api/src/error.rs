//! Error types for PdfStamp API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfstamp_core::StampError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No PDF data provided")]
    MissingInput,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transform failed: {0}")]
    Transform(#[from] StampError),

    #[error("Processing timed out")]
    Timeout,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingInput => {
                (StatusCode::BAD_REQUEST, "No PDF data provided".to_string())
            }
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Transform(e @ StampError::Parse(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Transform(e) => {
                tracing::error!("Transform error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process PDF".to_string(),
                )
            }
            ApiError::Timeout => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Processing timed out".to_string(),
            ),
            ApiError::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store signed document".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
