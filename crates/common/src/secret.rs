//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports from the [`secrecy`] crate with project-specific guidance.
//! Use these types for every sensitive value the auth service touches:
//! plaintext passwords, signing-key material, and bearer tokens.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so
//! any struct that derives `Debug` and wraps its sensitive fields in these
//! types gets safe logging behavior for free. Values are zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct LoginAttempt {
//!     username: String,
//!     password: SecretString, // Debug prints a redaction marker
//! }
//!
//! let attempt = LoginAttempt {
//!     username: "alice".to_string(),
//!     password: SecretString::from("correct-horse"),
//! };
//!
//! // Safe: the password is redacted
//! let shown = format!("{attempt:?}");
//! assert!(!shown.contains("correct-horse"));
//!
//! // Access requires an explicit expose_secret() call
//! let raw: &str = attempt.password.expose_secret();
//! assert_eq!(raw, "correct-horse");
//! ```
//!
//! # Usage guidelines
//!
//! Use `SecretString` for passwords and base64-encoded key material in
//! transit. Use `SecretBox<Vec<u8>>` for raw signing-key bytes held in
//! memory for the process lifetime.

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
