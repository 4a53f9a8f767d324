//! In-memory collaborator implementations for tests.
//!
//! These back both the unit tests and the integration suite, so they live
//! in the library rather than behind `#[cfg(test)]`. Not for production
//! use.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::clients::{ConfigStore, UserDirectory};
use crate::errors::AuthError;
use crate::keystore::SECRET_KEY_PARAMETER;
use crate::models::{Parameter, UserRecord};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory parameter store with call counting.
#[derive(Default)]
pub struct InMemoryConfigStore {
    parameters: Mutex<HashMap<String, Parameter>>,
    get_calls: AtomicUsize,
    save_calls: AtomicUsize,
    /// Number of upcoming `get_parameter` calls that will fail.
    failing_gets: AtomicUsize,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, parameter: Parameter) {
        self.parameters
            .lock()
            .expect("parameter map lock poisoned")
            .insert(parameter.parameter_name.clone(), parameter);
    }

    /// Make the next `n` fetches fail with an upstream error.
    pub fn fail_next_gets(&self, n: usize) {
        self.failing_gets.store(n, Ordering::SeqCst);
    }

    pub fn get_call_count(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn save_call_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<Parameter>, AuthError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        let failing = self.failing_gets.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_gets.store(failing - 1, Ordering::SeqCst);
            return Err(AuthError::Upstream("injected fetch failure".to_string()));
        }

        Ok(self
            .parameters
            .lock()
            .expect("parameter map lock poisoned")
            .get(name)
            .cloned())
    }

    async fn save_parameter(&self, parameter: &Parameter) -> Result<(), AuthError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        self.insert(parameter.clone());
        Ok(())
    }
}

/// A config store pre-seeded with a valid signing-key parameter (fixed
/// 64-byte key, 1-hour token lifetime).
pub fn seeded_config_store() -> InMemoryConfigStore {
    let store = InMemoryConfigStore::new();
    let key = general_purpose::STANDARD.encode([42u8; 64]);
    store.insert(Parameter {
        parameter_name: SECRET_KEY_PARAMETER.to_string(),
        value: format!(
            r#"{{"keyApplication": "{}", "timeExpire": "3600000"}}"#,
            key
        ),
        description: "JWT secret key and expiration time for signing tokens".to_string(),
    });
    store
}

/// In-memory user directory keyed by username.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user record.
    pub fn insert(&self, user: UserRecord) {
        self.users
            .lock()
            .expect("user map lock poisoned")
            .insert(user.username.clone(), user);
    }

    pub fn remove(&self, username: &str) {
        self.users
            .lock()
            .expect("user map lock poisoned")
            .remove(username);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        Ok(self
            .users
            .lock()
            .expect("user map lock poisoned")
            .get(username)
            .cloned())
    }
}
