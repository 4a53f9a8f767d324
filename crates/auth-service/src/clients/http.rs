//! HTTP implementations of the collaborator contracts.
//!
//! Thin reverse-proxy clients: one URL per operation, JSON bodies, no
//! retries (retry policy belongs to the caller). A missing resource (404)
//! maps to `Ok(None)`; any transport or server failure maps to
//! `AuthError::Upstream`.

use crate::clients::{ConfigStore, UserDirectory};
use crate::errors::AuthError;
use crate::models::{Parameter, UserRecord};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Client for the configuration service's parameter API.
#[derive(Debug, Clone)]
pub struct HttpConfigStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConfigStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn get_parameter(&self, name: &str) -> Result<Option<Parameter>, AuthError> {
        let url = format!("{}/api/parameters/getParameterName/{}", self.base_url, name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("Parameter fetch failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| AuthError::Upstream(format!("Parameter fetch failed: {}", e)))?;

        let parameter = response
            .json::<Parameter>()
            .await
            .map_err(|e| AuthError::Upstream(format!("Parameter response malformed: {}", e)))?;

        Ok(Some(parameter))
    }

    async fn save_parameter(&self, parameter: &Parameter) -> Result<(), AuthError> {
        let url = format!("{}/api/parameters", self.base_url);

        self.client
            .post(&url)
            .json(parameter)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("Parameter save failed: {}", e)))?
            .error_for_status()
            .map_err(|e| AuthError::Upstream(format!("Parameter save failed: {}", e)))?;

        Ok(())
    }
}

/// Client for the authorization service's user API.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRecord>, AuthError> {
        let url = format!("{}/api/user/{}", self.base_url, username);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("User fetch failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = response
            .error_for_status()
            .map_err(|e| AuthError::Upstream(format!("User fetch failed: {}", e)))?;

        let record = response
            .json::<UserRecord>()
            .await
            .map_err(|e| AuthError::Upstream(format!("User response malformed: {}", e)))?;

        Ok(Some(record))
    }
}
