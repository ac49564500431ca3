//! Error Types
//!
//! Centralized error taxonomy for the service. Components return `ApiError`
//! and the axum boundary maps each kind to an HTTP status with a JSON body
//! of the form `{"error": message}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    /// The single verification failure reported for any bad bearer token.
    /// Callers must not be able to distinguish why verification failed.
    pub fn invalid_token() -> Self {
        ApiError::Unauthorized("Invalid or expired token".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Database(_) | ApiError::Config(_) | ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            ),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::Database(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for ApiError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        ApiError::Internal
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("JWT error: {:?}", err);
        ApiError::invalid_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_failures_collapse_to_one_message() {
        let a = ApiError::invalid_token();
        let b: ApiError =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::ExpiredSignature)
                .into();
        assert_eq!(a.to_string(), b.to_string());
    }
}
