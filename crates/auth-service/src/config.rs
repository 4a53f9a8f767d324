use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default timeout for collaborator (config store / user directory) calls.
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// Base URL of the configuration service (parameter persistence)
    pub config_service_url: String,
    /// Base URL of the user directory service
    pub user_service_url: String,
    /// Upper bound on any single collaborator call
    pub upstream_timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| "0.0.0.0:8004".to_string());

        let config_service_url = vars
            .get("CONFIG_SERVICE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("CONFIG_SERVICE_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let user_service_url = vars
            .get("USER_SERVICE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("USER_SERVICE_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let upstream_timeout_ms = match vars.get("UPSTREAM_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                name: "UPSTREAM_TIMEOUT_MS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_MS,
        };

        Ok(Config {
            bind_address,
            config_service_url,
            user_service_url,
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([
            (
                "CONFIG_SERVICE_URL".to_string(),
                "http://localhost:8005".to_string(),
            ),
            (
                "USER_SERVICE_URL".to_string(),
                "http://localhost:8003".to_string(),
            ),
        ])
    }

    #[test]
    fn test_from_vars_success() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("UPSTREAM_TIMEOUT_MS".to_string(), "2500".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.config_service_url, "http://localhost:8005");
        assert_eq!(config.user_service_url, "http://localhost:8003");
        assert_eq!(config.upstream_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = Config::from_vars(&base_vars()).expect("Config should load successfully");

        assert_eq!(config.bind_address, "0.0.0.0:8004");
        assert_eq!(
            config.upstream_timeout,
            Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS)
        );
    }

    #[test]
    fn test_from_vars_missing_config_service_url() {
        let mut vars = base_vars();
        vars.remove("CONFIG_SERVICE_URL");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "CONFIG_SERVICE_URL"));
    }

    #[test]
    fn test_from_vars_missing_user_service_url() {
        let mut vars = base_vars();
        vars.remove("USER_SERVICE_URL");

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "USER_SERVICE_URL"));
    }

    #[test]
    fn test_from_vars_non_numeric_timeout() {
        let mut vars = base_vars();
        vars.insert("UPSTREAM_TIMEOUT_MS".to_string(), "soon".to_string());

        let result = Config::from_vars(&vars);
        assert!(
            matches!(result, Err(ConfigError::InvalidValue { name, .. }) if name == "UPSTREAM_TIMEOUT_MS")
        );
    }

    #[test]
    fn test_from_vars_strips_trailing_slash() {
        let mut vars = base_vars();
        vars.insert(
            "CONFIG_SERVICE_URL".to_string(),
            "http://localhost:8005/".to_string(),
        );

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(config.config_service_url, "http://localhost:8005");
    }
}
