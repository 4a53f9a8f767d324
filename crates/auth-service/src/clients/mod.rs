//! Collaborator contracts consumed by the authentication core.
//!
//! The core never owns user records or configuration parameters; both live
//! in sibling services. These traits are the transport-agnostic seams: the
//! HTTP implementations in [`http`] are thin wrappers, and the in-memory
//! implementations in [`crate::testutil`] back the test suite.

pub mod http;

use crate::errors::AuthError;
use crate::models::{Parameter, UserRecord};
use async_trait::async_trait;

/// Configuration-parameter persistence, backed by the configuration service.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a parameter by name. `Ok(None)` means the parameter does not
    /// exist; transport failures surface as `AuthError::Upstream`.
    async fn get_parameter(&self, name: &str) -> Result<Option<Parameter>, AuthError>;

    /// Create or update a parameter.
    async fn save_parameter(&self, parameter: &Parameter) -> Result<(), AuthError>;
}

/// Read-only access to user records, backed by the authorization service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user by username. `Ok(None)` means no such user.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError>;
}
