use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Why a token failed validation.
///
/// Kept internal for logging and metrics; callers only ever see the merged
/// "invalid or expired" message so they cannot probe which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFailureKind {
    /// Parse or signature failure
    Malformed,
    /// Signature verified but the token is past its expiry
    Expired,
}

impl TokenFailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenFailureKind::Malformed => "malformed",
            TokenFailureKind::Expired => "expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad username, bad password, or unresolvable subject. Deliberately a
    /// single variant so responses cannot be used for username enumeration.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signature failure or expiry; the distinction lives in `kind` only.
    #[error("The access token is invalid or expired")]
    InvalidToken { kind: TokenFailureKind },

    /// Malformed persisted key material or parameter payload
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A collaborator call failed or timed out
    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
            ),
            // One body for malformed and expired tokens; the kind is logged
            // server-side only.
            AuthError::InvalidToken { .. } => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "The access token is invalid or expired".to_string(),
            ),
            AuthError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "An internal configuration error occurred".to_string(),
            ),
            AuthError::Upstream(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UPSTREAM_UNAVAILABLE",
                "A dependent service is unavailable".to_string(),
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred".to_string(),
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
