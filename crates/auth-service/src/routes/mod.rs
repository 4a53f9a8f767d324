use crate::handlers::auth_handler::{self, AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Authentication endpoints
        .route("/api/v1/auth/login", post(auth_handler::login))
        .route("/api/v1/auth/validate", get(auth_handler::validate))
        // Health check
        .route("/health", get(health_check))
        // Prometheus scrape endpoint
        .route("/metrics", get(render_metrics))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn render_metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}
