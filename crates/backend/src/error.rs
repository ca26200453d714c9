//! Unified error handling for the backend API.
//!
//! This module provides a centralized error type that implements `IntoResponse`,
//! allowing handlers to use `?` operator naturally while returning appropriate
//! HTTP status codes and error messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::mailer::MailerError;

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unified error type for API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request input, rejected before anything else runs
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The identity API explicitly rejected the credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The identity API could not be reached or answered garbage.
    /// The detail is logged server-side, never sent to the caller.
    #[error("Authentication failed")]
    Upstream(anyhow::Error),

    /// No bearer token on a request that needs one
    #[error("No token provided")]
    MissingToken,

    /// Bad signature, tampered payload or expired token. Deliberately a
    /// single variant so callers cannot tell which check failed.
    #[error("Invalid token")]
    InvalidToken,

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// SMTP delivery failure
    #[error("Failed to send email")]
    Mail(#[from] MailerError),

    /// Anything else
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            ApiError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation failed".to_string(),
                Some(fields.join(", ")),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".to_string(),
                None,
            ),
            ApiError::Upstream(e) => {
                tracing::error!("Identity API error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication failed".to_string(),
                    None,
                )
            }
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "No token provided".to_string(),
                None,
            ),
            ApiError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Invalid token".to_string(), None)
            }
            ApiError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                format!("{} not found", resource),
                None,
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::Mail(e) => {
                tracing::error!("Mail delivery error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                    None,
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
