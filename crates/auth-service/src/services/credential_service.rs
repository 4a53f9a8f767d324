//! Username/password verification against the user directory.

use crate::clients::UserDirectory;
use crate::crypto;
use crate::errors::AuthError;
use crate::models::{Credentials, UserRecord};
use common::secret::ExposeSecret;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A valid bcrypt hash of a random string, verified against when the
/// requested user does not exist so that absent and present usernames cost
/// a comparable amount of work. Never matches a real password.
const DUMMY_BCRYPT_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewY5GyYqExt7YD3a";

/// Verifies login credentials.
///
/// Every failure mode (unknown username, inactive account, wrong password)
/// collapses to [`AuthError::InvalidCredentials`] so responses cannot be
/// used to enumerate usernames. Collaborator and crypto failures propagate
/// as themselves; the orchestrator decides how to surface those.
pub struct CredentialVerifier {
    user_directory: Arc<dyn UserDirectory>,
}

impl CredentialVerifier {
    pub fn new(user_directory: Arc<dyn UserDirectory>) -> Self {
        Self { user_directory }
    }

    /// Resolve the username and check the password against its bcrypt hash.
    #[instrument(skip_all)]
    pub async fn verify(&self, credentials: &Credentials) -> Result<UserRecord, AuthError> {
        let user = self
            .user_directory
            .get_user_by_username(&credentials.username)
            .await?;

        let Some(user) = user else {
            // Burn a bcrypt verification anyway so a missing user is not
            // distinguishable from a wrong password by response time.
            let _ = crypto::verify_password(credentials.password.expose_secret(), DUMMY_BCRYPT_HASH);
            debug!(target: "credentials", "Login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let password_matches =
            crypto::verify_password(credentials.password.expose_secret(), &user.password_hash)?;

        if !password_matches {
            debug!(target: "credentials", "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.active {
            debug!(target: "credentials", "Login rejected: account inactive");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testutil::InMemoryUserDirectory;

    fn credentials(username: &str, password: &str) -> Credentials {
        serde_json::from_str(&format!(
            r#"{{"username": "{}", "password": "{}"}}"#,
            username, password
        ))
        .unwrap()
    }

    fn directory_with_user(username: &str, password: &str, active: bool) -> InMemoryUserDirectory {
        let directory = InMemoryUserDirectory::new();
        directory.insert(UserRecord {
            id: "u1".to_string(),
            username: username.to_string(),
            password_hash: crypto::hash_password(password).unwrap(),
            roles: vec!["USER".to_string()],
            active,
        });
        directory
    }

    #[tokio::test]
    async fn test_verify_accepts_valid_credentials() {
        let directory = Arc::new(directory_with_user("alice", "hunter2", true));
        let verifier = CredentialVerifier::new(directory);

        let user = verifier.verify(&credentials("alice", "hunter2")).await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_verify_rejects_wrong_password() {
        let directory = Arc::new(directory_with_user("alice", "hunter2", true));
        let verifier = CredentialVerifier::new(directory);

        let result = verifier.verify(&credentials("alice", "wrong")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_user() {
        let verifier = CredentialVerifier::new(Arc::new(InMemoryUserDirectory::new()));

        let result = verifier.verify(&credentials("nobody", "hunter2")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_rejects_inactive_user() {
        let directory = Arc::new(directory_with_user("alice", "hunter2", false));
        let verifier = CredentialVerifier::new(directory);

        // Right password, deactivated account: same error as a wrong password
        let result = verifier.verify(&credentials("alice", "hunter2")).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let directory = Arc::new(directory_with_user("alice", "hunter2", true));
        let verifier = CredentialVerifier::new(directory);

        let unknown = verifier.verify(&credentials("nobody", "x")).await.unwrap_err();
        let wrong = verifier.verify(&credentials("alice", "x")).await.unwrap_err();

        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_dummy_hash_is_a_parseable_bcrypt_hash() {
        // verify_password must not error on the dummy hash, only mismatch
        let matches = crypto::verify_password("anything", DUMMY_BCRYPT_HASH).unwrap();
        assert!(!matches);
    }
}
