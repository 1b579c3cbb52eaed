//! Unified error handling for the demo server.
//!
//! Every failure a handler or the auth layer can produce is an `ApiError`,
//! which renders to a JSON body and the matching HTTP status. Auth failures
//! also carry the `WWW-Authenticate` challenge for their scheme.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

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
    /// Bad username/password or a bad, expired or malformed token.
    /// The cause is deliberately not surfaced.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// HTTP Basic credentials were missing or unreadable
    #[error("Basic authentication required")]
    BasicAuthRequired,

    /// Valid credentials for a disabled account
    #[error("Inactive user")]
    InactiveAccount,

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Signing, serialization or other unexpected failure
    #[error("{0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        ApiError::InvalidCredentials(message.into())
    }

    /// Create a not found error with a custom message
    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound(resource.into())
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials(_) | ApiError::BasicAuthRequired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InactiveAccount | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_message, details, challenge) = match &self {
            ApiError::InvalidCredentials(msg) => (msg.clone(), None, Some("Bearer")),
            ApiError::BasicAuthRequired => (
                "Not authenticated".to_string(),
                None,
                Some("Basic"),
            ),
            ApiError::InactiveAccount => ("Inactive user".to_string(), None, None),
            ApiError::NotFound(resource) => (format!("{} not found", resource), None, None),
            ApiError::BadRequest(msg) => (msg.clone(), None, None),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    "Internal server error".to_string(),
                    Some(e.to_string()),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
            details,
        });

        match challenge {
            Some(scheme) => (status, [(header::WWW_AUTHENTICATE, scheme)], body).into_response(),
            None => (status, body).into_response(),
        }
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
