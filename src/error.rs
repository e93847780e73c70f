//! Error types for the Citeline server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::lookup::LookupError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Document lookup error: {0}")]
    Lookup(#[from] LookupError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Lookup(e) => match e {
                LookupError::InvalidSlug(slug) => (
                    StatusCode::BAD_REQUEST,
                    "invalid_slug",
                    format!("Invalid share slug: {}", slug),
                ),
                LookupError::Backend { slug, status } if *status == 404 => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Share not found: {}", slug),
                ),
                _ => {
                    tracing::error!("Document lookup error: {}", e);
                    (
                        StatusCode::BAD_GATEWAY,
                        "backend_error",
                        "Failed to load share documents".to_string(),
                    )
                }
            },
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        (status, body).into_response()
    }
}
