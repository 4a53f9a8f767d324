//! Service layer: credential verification, token issuance/validation, and
//! the orchestrator that composes them behind the HTTP handlers.

pub mod auth_service;
pub mod credential_service;
pub mod token_service;

pub use auth_service::AuthOrchestrator;
pub use credential_service::CredentialVerifier;
pub use token_service::TokenService;
