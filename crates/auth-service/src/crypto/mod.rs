use crate::errors::{AuthError, TokenFailureKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (4KB).
///
/// Oversized tokens are rejected before any base64 decoding or signature
/// work, bounding the cost an unauthenticated caller can impose. Typical
/// tokens here are 300-500 bytes.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Minimum signing-key length in bytes. HMAC-SHA-512 requires key material
/// of at least the hash output size (512 bits).
pub const MIN_HMAC_KEY_BYTES: usize = 64;

/// Bcrypt cost factor for password hashes produced by this service.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// JWT claims structure.
///
/// The `roles` claim is the comma-join of the user's role names at issuance
/// time, in directory order. The `sub` field is an identifier and is
/// redacted from `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (username)
    pub roles: String, // Comma-joined role names
    pub iat: i64,      // Issued at (epoch seconds)
    pub exp: i64,      // Expiration (epoch seconds)
}

impl Claims {
    /// Split the comma-joined roles claim back into role names.
    ///
    /// An empty claim yields an empty list rather than one empty name.
    pub fn role_names(&self) -> Vec<String> {
        if self.roles.is_empty() {
            return Vec::new();
        }
        self.roles.split(',').map(|r| r.to_string()).collect()
    }
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("roles", &self.roles)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// Sign claims into a compact JWT with HMAC-SHA-512.
#[instrument(skip_all)]
pub fn sign_jwt(claims: &Claims, key: &[u8]) -> Result<String, AuthError> {
    if key.len() < MIN_HMAC_KEY_BYTES {
        return Err(AuthError::Crypto(format!(
            "Signing key too short: {} bytes (minimum {})",
            key.len(),
            MIN_HMAC_KEY_BYTES
        )));
    }

    let header = Header::new(Algorithm::HS512);
    let encoding_key = EncodingKey::from_secret(key);

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::Crypto(format!("JWT signing operation failed: {}", e)))
}

/// Verify a JWT signature and deserialize its claims.
///
/// Checks the token size cap and the HMAC-SHA-512 signature. Expiry is NOT
/// checked here: the caller compares the `exp` claim against its own clock
/// so the boundary is exact and testable. Any parse or signature failure
/// maps to `TokenFailureKind::Malformed`.
#[instrument(skip_all)]
pub fn verify_jwt(token: &str, key: &[u8]) -> Result<Claims, AuthError> {
    // Size check before any parsing or cryptographic work
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AuthError::InvalidToken {
            kind: TokenFailureKind::Malformed,
        });
    }

    let decoding_key = DecodingKey::from_secret(key);

    let mut validation = Validation::new(Algorithm::HS512);
    // Expiry is enforced by the token service against a supplied instant
    validation.validate_exp = false;
    validation.required_spec_claims.insert("exp".to_string());

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        AuthError::InvalidToken {
            kind: TokenFailureKind::Malformed,
        }
    })?;

    Ok(token_data.claims)
}

/// Hash a password with bcrypt using the service's cost factor.
#[instrument(skip_all)]
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, DEFAULT_BCRYPT_COST)
        .map_err(|e| AuthError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash)
        .map_err(|e| AuthError::Crypto(format!("Password verification failed: {}", e)))
}

/// Generate cryptographically secure random bytes
pub fn generate_random_bytes(len: usize) -> Result<Vec<u8>, AuthError> {
    let rng = SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|e| AuthError::Crypto(format!("Random bytes generation failed: {}", e)))?;
    Ok(bytes)
}
