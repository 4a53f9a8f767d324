//! The orchestrator composing credential checks, token operations, and the
//! user directory behind the two public authentication operations.

use crate::clients::UserDirectory;
use crate::errors::AuthError;
use crate::keystore::KeyStore;
use crate::models::{AuthenticatedPrincipal, Credentials, Session};
use crate::observability::metrics::{record_login, record_token_validation};
use crate::observability::ErrorCategory;
use crate::services::{CredentialVerifier, TokenService};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, instrument, warn};

/// End-to-end authentication flows.
///
/// Login never returns anything other than a session or
/// [`AuthError::InvalidCredentials`]: internal failures on that path are
/// logged with their real cause and then concealed, so the response gives
/// an attacker no signal about the service's internals. Introspection uses
/// the full error taxonomy.
pub struct AuthOrchestrator {
    credential_verifier: CredentialVerifier,
    token_service: TokenService,
    user_directory: Arc<dyn UserDirectory>,
}

impl AuthOrchestrator {
    pub fn new(key_store: Arc<KeyStore>, user_directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            credential_verifier: CredentialVerifier::new(Arc::clone(&user_directory)),
            token_service: TokenService::new(key_store),
            user_directory,
        }
    }

    /// Verify credentials and issue a session token.
    #[instrument(skip_all)]
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let start = Instant::now();
        let result = self.login_at(credentials, Utc::now()).await;

        let status = if result.is_ok() { "success" } else { "error" };
        record_login(status, start.elapsed());

        result
    }

    /// Login with an injected issuance instant.
    pub async fn login_at(
        &self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let user = match self.credential_verifier.verify(credentials).await {
            Ok(user) => user,
            Err(AuthError::InvalidCredentials) => return Err(AuthError::InvalidCredentials),
            Err(err) => {
                // Real cause stays in the logs; the response is
                // indistinguishable from a bad password.
                error!(target: "auth", error = %err, "Login failed due to internal error");
                return Err(AuthError::InvalidCredentials);
            }
        };

        match self.token_service.issue(&user, now).await {
            Ok(session) => Ok(session),
            Err(err) => {
                error!(target: "auth", error = %err, "Token issuance failed during login");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Validate a token and re-resolve its subject against the directory.
    ///
    /// Roles are taken from the directory record, not the token, so role
    /// changes and deactivations take effect immediately on outstanding
    /// tokens.
    #[instrument(skip_all)]
    pub async fn introspect(&self, token: &str) -> Result<AuthenticatedPrincipal, AuthError> {
        self.introspect_at(token, Utc::now()).await
    }

    /// Introspection with an injected validation instant.
    pub async fn introspect_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let claims = match self.token_service.validate(token, now.timestamp_millis()).await {
            Ok(claims) => claims,
            Err(err) => {
                let category = match &err {
                    AuthError::InvalidToken { kind } => kind.as_str(),
                    other => ErrorCategory::from(other).as_str(),
                };
                record_token_validation("error", Some(category));
                warn!(target: "auth", category, "Token validation failed");
                return Err(err);
            }
        };

        let user = self.user_directory.get_user_by_username(&claims.sub).await?;

        match user {
            Some(user) if user.active => {
                record_token_validation("success", None);
                Ok(AuthenticatedPrincipal {
                    username: user.username,
                    roles: user.roles,
                })
            }
            _ => {
                // Subject vanished or was deactivated after issuance
                record_token_validation("error", Some("authentication"));
                warn!(target: "auth", "Token subject is unknown or inactive");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
