//! HTTP handlers for the authentication endpoints.

use crate::errors::{AuthError, TokenFailureKind};
use crate::models::{AuthenticatedPrincipal, Credentials, Session};
use crate::services::AuthOrchestrator;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::instrument;

/// Shared application state.
pub struct AppState {
    pub orchestrator: AuthOrchestrator,
    pub metrics: PrometheusHandle,
}

/// POST /api/v1/auth/login
///
/// Exchanges a username/password pair for a signed session token. All
/// rejection reasons surface as the same 401 body.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Session>, AuthError> {
    let session = state.orchestrator.login(&credentials).await?;
    Ok(Json(session))
}

/// GET /api/v1/auth/validate
///
/// Validates the bearer token and returns the authenticated principal with
/// its current (re-resolved) roles.
#[instrument(skip_all)]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AuthenticatedPrincipal>, AuthError> {
    let token = bearer_token(&headers)?;
    let principal = state.orchestrator.introspect(token).await?;
    Ok(Json(principal))
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// A missing or non-Bearer header gets the same merged response as a bad
/// token.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidToken {
            kind: TokenFailureKind::Malformed,
        })
}
