//! Signing-key bootstrap and in-process key cache.
//!
//! The signing key is the only shared mutable state in the service. It is
//! loaded (or generated and persisted) exactly once per process lifetime:
//! concurrent callers await the single in-flight bootstrap instead of
//! racing to generate independent keys, and a failed attempt leaves the
//! store not-ready so a later call can retry.

use crate::clients::ConfigStore;
use crate::crypto::{self, MIN_HMAC_KEY_BYTES};
use crate::errors::AuthError;
use crate::models::Parameter;
use crate::observability::metrics::record_key_bootstrap;
use base64::{engine::general_purpose, Engine as _};
use common::secret::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

/// Name of the persisted signing-key parameter in the configuration service.
pub const SECRET_KEY_PARAMETER: &str = "jwtSecretKey";

/// Size of a freshly generated signing key. 64 bytes = 512 bits, the
/// HMAC-SHA-512 block-aligned minimum.
const GENERATED_KEY_BYTES: usize = 64;

/// Expiration applied to tokens signed with a freshly generated key (1 hour).
const DEFAULT_EXPIRATION_MS: i64 = 3_600_000;

/// Persisted shape of the signing-key parameter value.
///
/// `time_expire` is a string-encoded integer for compatibility with the
/// configuration service's string-typed parameter values.
#[derive(Debug, Serialize, Deserialize)]
struct KeyParameterValue {
    #[serde(rename = "keyApplication")]
    key_application: String,
    #[serde(rename = "timeExpire")]
    time_expire: String,
}

/// The live signing key: raw HMAC material, token expiration policy, and
/// the base64 form used for persistence. Immutable once adopted.
pub struct SecretKeyMaterial {
    key: SecretBox<Vec<u8>>,
    expiration_ms: i64,
    encoded: String,
}

impl SecretKeyMaterial {
    /// Generate fresh key material with the default expiration.
    pub fn generate() -> Result<Self, AuthError> {
        let bytes = crypto::generate_random_bytes(GENERATED_KEY_BYTES)?;
        let encoded = general_purpose::STANDARD.encode(&bytes);

        Ok(Self {
            key: SecretBox::new(Box::new(bytes)),
            expiration_ms: DEFAULT_EXPIRATION_MS,
            encoded,
        })
    }

    /// Decode key material from a persisted parameter.
    ///
    /// Any shape violation (unparseable JSON, bad base64, undersized key,
    /// non-positive or non-numeric expiry) is a configuration error; there
    /// is no silent fallback to a regenerated key.
    pub fn from_parameter(parameter: &Parameter) -> Result<Self, AuthError> {
        let value: KeyParameterValue = serde_json::from_str(&parameter.value).map_err(|e| {
            AuthError::Configuration(format!(
                "Parameter '{}' value is not the expected key/expiry shape: {}",
                parameter.parameter_name, e
            ))
        })?;

        let bytes = general_purpose::STANDARD
            .decode(&value.key_application)
            .map_err(|e| {
                AuthError::Configuration(format!("Persisted key is not valid base64: {}", e))
            })?;

        if bytes.len() < MIN_HMAC_KEY_BYTES {
            return Err(AuthError::Configuration(format!(
                "Persisted key too short: {} bytes (minimum {})",
                bytes.len(),
                MIN_HMAC_KEY_BYTES
            )));
        }

        let expiration_ms = value.time_expire.parse::<i64>().map_err(|e| {
            AuthError::Configuration(format!("Persisted expiry is not numeric: {}", e))
        })?;

        if expiration_ms <= 0 {
            return Err(AuthError::Configuration(format!(
                "Persisted expiry must be positive, got {}",
                expiration_ms
            )));
        }

        Ok(Self {
            key: SecretBox::new(Box::new(bytes)),
            expiration_ms,
            encoded: value.key_application,
        })
    }

    /// Build the parameter payload under which this key is persisted.
    pub fn to_parameter(&self) -> Result<Parameter, AuthError> {
        let value = KeyParameterValue {
            key_application: self.encoded.clone(),
            time_expire: self.expiration_ms.to_string(),
        };

        let value = serde_json::to_string(&value)
            .map_err(|e| AuthError::Configuration(format!("Key payload encoding failed: {}", e)))?;

        Ok(Parameter {
            parameter_name: SECRET_KEY_PARAMETER.to_string(),
            value,
            description: "JWT secret key and expiration time for signing tokens".to_string(),
        })
    }

    /// Raw HMAC key bytes.
    pub fn key_bytes(&self) -> &[u8] {
        self.key.expose_secret()
    }

    /// Token lifetime in milliseconds.
    pub fn expiration_ms(&self) -> i64 {
        self.expiration_ms
    }
}

impl fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKeyMaterial")
            .field("key", &"[REDACTED]")
            .field("expiration_ms", &self.expiration_ms)
            .finish()
    }
}

/// Process-wide holder of the signing key.
///
/// `ensure_ready`/`signing_key` run the load-or-generate bootstrap at most
/// once concurrently via a [`OnceCell`]; once a key is adopted it never
/// changes for the process lifetime. Collaborator calls are bounded by the
/// configured upstream timeout so a hung configuration service cannot wedge
/// the store permanently.
pub struct KeyStore {
    config_store: Arc<dyn ConfigStore>,
    upstream_timeout: Duration,
    key: OnceCell<SecretKeyMaterial>,
}

impl KeyStore {
    pub fn new(config_store: Arc<dyn ConfigStore>, upstream_timeout: Duration) -> Self {
        Self {
            config_store,
            upstream_timeout,
            key: OnceCell::new(),
        }
    }

    /// Run the bootstrap if it has not completed yet.
    pub async fn ensure_ready(&self) -> Result<(), AuthError> {
        self.signing_key().await.map(|_| ())
    }

    /// The live signing key, bootstrapping first if necessary.
    pub async fn signing_key(&self) -> Result<&SecretKeyMaterial, AuthError> {
        self.key.get_or_try_init(|| self.bootstrap()).await
    }

    #[instrument(skip_all)]
    async fn bootstrap(&self) -> Result<SecretKeyMaterial, AuthError> {
        let fetched = self
            .bounded(self.config_store.get_parameter(SECRET_KEY_PARAMETER))
            .await?;

        match fetched {
            Some(parameter) => {
                let material = SecretKeyMaterial::from_parameter(&parameter)?;
                info!(
                    expiration_ms = material.expiration_ms(),
                    "Signing key loaded from configuration service"
                );
                record_key_bootstrap("loaded");
                Ok(material)
            }
            None => {
                let material = SecretKeyMaterial::generate()?;
                let parameter = material.to_parameter()?;

                // A generated key must be durably recorded before the store
                // is considered ready; a failed save fails the bootstrap.
                self.bounded(self.config_store.save_parameter(&parameter))
                    .await?;

                info!(
                    expiration_ms = material.expiration_ms(),
                    "Signing key generated and persisted"
                );
                record_key_bootstrap("generated");
                Ok(material)
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        tokio::time::timeout(self.upstream_timeout, call)
            .await
            .map_err(|_| {
                AuthError::Upstream(format!(
                    "Configuration service call timed out after {:?}",
                    self.upstream_timeout
                ))
            })?
    }
}
