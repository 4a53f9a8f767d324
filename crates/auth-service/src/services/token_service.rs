//! Token issuance and validation on top of the signing-key store.

use crate::crypto::{self, Claims};
use crate::errors::{AuthError, TokenFailureKind};
use crate::keystore::KeyStore;
use crate::models::{Session, UserRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

/// Issues and validates HMAC-SHA-512 session tokens.
///
/// Expiry is enforced here, not in the signature layer: `validate` compares
/// the caller-supplied instant against the `exp` claim at millisecond
/// precision, so the boundary is exact and clock injection is possible in
/// tests.
pub struct TokenService {
    key_store: Arc<KeyStore>,
}

impl TokenService {
    pub fn new(key_store: Arc<KeyStore>) -> Self {
        Self { key_store }
    }

    /// Sign a session token for an already-authenticated user.
    ///
    /// The roles claim is the comma-join of the user's role names in
    /// directory order. The expiry equals issuance time plus the key's
    /// configured lifetime, truncated to whole seconds to match the claim.
    #[instrument(skip_all)]
    pub async fn issue(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let key = self.key_store.signing_key().await?;

        let exp_seconds = (now + chrono::Duration::milliseconds(key.expiration_ms())).timestamp();
        let expires_at = DateTime::from_timestamp(exp_seconds, 0).ok_or(AuthError::Internal)?;

        let claims = Claims {
            sub: user.username.clone(),
            roles: user.roles.join(","),
            iat: now.timestamp(),
            exp: exp_seconds,
        };

        let token = crypto::sign_jwt(&claims, key.key_bytes())?;

        Ok(Session {
            username: user.username.clone(),
            token,
            expires_at,
        })
    }

    /// Verify a token's signature and check its expiry against `now_ms`
    /// (epoch milliseconds).
    ///
    /// A token whose `exp` is E seconds is valid strictly before E*1000 ms:
    /// at `now_ms == exp * 1000` it is already expired.
    #[instrument(skip_all)]
    pub async fn validate(&self, token: &str, now_ms: i64) -> Result<Claims, AuthError> {
        let key = self.key_store.signing_key().await?;
        let claims = crypto::verify_jwt(token, key.key_bytes())?;

        let exp_ms = claims.exp.saturating_mul(1000);
        if now_ms >= exp_ms {
            return Err(AuthError::InvalidToken {
                kind: TokenFailureKind::Expired,
            });
        }

        Ok(claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testutil::{seeded_config_store, InMemoryConfigStore};
    use std::time::Duration;

    fn test_user(roles: &[&str]) -> UserRecord {
        UserRecord {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password_hash: "unused".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            active: true,
        }
    }

    fn key_store(config_store: InMemoryConfigStore) -> Arc<KeyStore> {
        Arc::new(KeyStore::new(
            Arc::new(config_store),
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn test_issue_then_validate_round_trip() {
        let service = TokenService::new(key_store(seeded_config_store()));
        let now = Utc::now();

        let session = service.issue(&test_user(&["ADMIN", "USER"]), now).await.unwrap();
        assert_eq!(session.username, "alice");

        let claims = service
            .validate(&session.token, now.timestamp_millis())
            .await
            .unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, "ADMIN,USER");
        assert_eq!(claims.role_names(), vec!["ADMIN", "USER"]);
    }

    #[tokio::test]
    async fn test_roles_preserve_directory_order() {
        let service = TokenService::new(key_store(seeded_config_store()));
        let now = Utc::now();

        // No sorting, no deduplication
        let session = service
            .issue(&test_user(&["zeta", "ALPHA", "zeta"]), now)
            .await
            .unwrap();
        let claims = service
            .validate(&session.token, now.timestamp_millis())
            .await
            .unwrap();

        assert_eq!(claims.roles, "zeta,ALPHA,zeta");
    }

    #[tokio::test]
    async fn test_expiry_boundary_is_exclusive() {
        let service = TokenService::new(key_store(seeded_config_store()));
        let now = Utc::now();

        let session = service.issue(&test_user(&[]), now).await.unwrap();
        let claims = service
            .validate(&session.token, now.timestamp_millis())
            .await
            .unwrap();
        let exp_ms = claims.exp * 1000;

        // One millisecond before expiry: still valid
        assert!(service.validate(&session.token, exp_ms - 1).await.is_ok());

        // Exactly at expiry: rejected as expired
        let at_boundary = service.validate(&session.token, exp_ms).await;
        assert!(matches!(
            at_boundary,
            Err(AuthError::InvalidToken {
                kind: TokenFailureKind::Expired
            })
        ));
    }

    #[tokio::test]
    async fn test_validate_rejects_garbage_as_malformed() {
        let service = TokenService::new(key_store(seeded_config_store()));

        let result = service.validate("garbage", Utc::now().timestamp_millis()).await;
        assert!(matches!(
            result,
            Err(AuthError::InvalidToken {
                kind: TokenFailureKind::Malformed
            })
        ));
    }

    #[tokio::test]
    async fn test_expiry_uses_key_configured_lifetime() {
        let service = TokenService::new(key_store(seeded_config_store()));
        let now = Utc::now();

        let session = service.issue(&test_user(&[]), now).await.unwrap();
        let claims = service
            .validate(&session.token, now.timestamp_millis())
            .await
            .unwrap();

        // Seeded key carries the default 1-hour lifetime
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(session.expires_at.timestamp(), claims.exp);
    }
}
