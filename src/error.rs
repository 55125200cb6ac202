use axum::response::{IntoResponse, Response};

use crate::middleware::response::{messages, Envelope};

/// Errors raised outside handler bodies (middleware, extractors). Handlers
/// reply through `reply::*` directly; this taxonomy only carries what the
/// middleware path needs and renders as the same envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        match err {
            crate::auth::AuthError::MissingSecret => {
                tracing::error!("JWT secret not configured");
                ApiError::internal(messages::INTERNAL_SERVER_ERROR)
            }
            _ => ApiError::unauthorized(messages::UNAUTHORIZED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Never expose internal detail to clients
            ApiError::Internal(_) => messages::INTERNAL_SERVER_ERROR.to_string(),
            other => other.to_string(),
        };
        Envelope::new(self.status_code(), message, None).into_response()
    }
}
