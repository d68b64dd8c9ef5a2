//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Error bodies are JSON. Access-gate failures use `{"error": ...}`, and every
//! other failure uses `{"message": ...}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;

/// Body sent for every server-side failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server Error";

/// Application-level error type for the shop API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No API key was presented.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The presented API key is wrong.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            // Unique and foreign-key violations answer 409 rather than 500.
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Auth(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Cart(CartError::InvalidUser(_)) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) | Self::Auth(_) | Self::Cart(CartError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show a client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_owned(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Auth(err) if err.is_client_error() => err.to_string(),
            Self::Cart(CartError::InvalidUser(_)) => "Invalid user".to_owned(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg) => msg.clone(),
            Self::Database(_) | Self::Auth(_) | Self::Cart(_) => SERVER_ERROR_MESSAGE.to_owned(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let message = self.public_message();
        let body = match self {
            Self::Unauthorized(_) | Self::Forbidden(_) => json!({ "error": message }),
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
