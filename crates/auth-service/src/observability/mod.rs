//! Observability module for the authentication service.
//!
//! # Privacy by Default
//!
//! Instrumentation uses `#[instrument(skip_all)]` with explicit safe field
//! allow-listing. Usernames appear in logs only at debug level on failure
//! paths; passwords, password hashes, tokens, and key material never do.

pub mod metrics;

/// Error categories for metrics labels (bounded cardinality).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Authentication failures (invalid credentials, bad or expired token)
    Authentication,
    /// Configuration failures (malformed persisted parameters)
    Configuration,
    /// Collaborator failures (config store or user directory unreachable)
    Upstream,
    /// Internal errors (crypto primitives, serialization)
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Upstream => "upstream",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&crate::errors::AuthError> for ErrorCategory {
    fn from(err: &crate::errors::AuthError) -> Self {
        use crate::errors::AuthError;
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken { .. } => {
                ErrorCategory::Authentication
            }
            AuthError::Configuration(_) => ErrorCategory::Configuration,
            AuthError::Upstream(_) => ErrorCategory::Upstream,
            AuthError::Crypto(_) | AuthError::Internal => ErrorCategory::Internal,
        }
    }
}
