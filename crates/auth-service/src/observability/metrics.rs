//! Metrics definitions for the authentication service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix for this service
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `status`: 2 values (success, error)
//! - `error_category`: 4 values (authentication, configuration, upstream, internal)
//! - `source`: 2 values (loaded, generated)

use metrics::{counter, histogram};
use std::time::Duration;

/// Record login outcome and duration.
///
/// Metric: `auth_login_duration_seconds`, `auth_login_total`
/// Labels: `status`
pub fn record_login(status: &str, duration: Duration) {
    histogram!("auth_login_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_login_total", "status" => status.to_string()).increment(1);
}

/// Record token introspection result.
///
/// Metric: `auth_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("auth_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record a completed signing-key bootstrap.
///
/// Metric: `auth_key_bootstrap_total`
/// Labels: `source` (loaded, generated)
pub fn record_key_bootstrap(source: &str) {
    counter!("auth_key_bootstrap_total", "source" => source.to_string()).increment(1);
}

/// Record a collaborator (config store / user directory) call.
///
/// Metric: `auth_upstream_request_duration_seconds`, `auth_upstream_requests_total`
/// Labels: `collaborator`, `status`
#[allow(dead_code)]
pub fn record_upstream_request(collaborator: &str, status: &str, duration: Duration) {
    histogram!("auth_upstream_request_duration_seconds", "collaborator" => collaborator.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_upstream_requests_total", "collaborator" => collaborator.to_string(), "status" => status.to_string())
        .increment(1);
}
