//! Application error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::repositories::StoreError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const INTERNAL: &str = "Internal server error";

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("User already exists")]
    DuplicateUser,

    /// Unknown email and wrong password are deliberately the same variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid ID")]
    InvalidIdentifier,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Failure on the gratitude/testimonial endpoints, reported as 400.
    #[error("{0}")]
    EntryFailed(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::DuplicateUser => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": "User already exists" }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": INVALID_CREDENTIALS }),
            ),
            AppError::InvalidIdentifier => {
                (StatusCode::BAD_REQUEST, json!({ "error": "Invalid ID" }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Store(e) => {
                error!(error = %e, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": INTERNAL }))
            }
            AppError::EntryFailed(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": msg }),
            ),
            AppError::Jwt(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": INTERNAL }))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
