use auth_service::clients::http::{HttpConfigStore, HttpUserDirectory};
use auth_service::config::Config;
use auth_service::handlers::auth_handler::AppState;
use auth_service::keystore::KeyStore;
use auth_service::routes;
use auth_service::services::AuthOrchestrator;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting authentication service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    // Install the Prometheus recorder before any metric is emitted
    let metrics = PrometheusBuilder::new().install_recorder().map_err(|e| {
        error!("Failed to install metrics recorder: {}", e);
        e
    })?;

    // Build collaborator clients
    let config_store = Arc::new(HttpConfigStore::new(
        &config.config_service_url,
        config.upstream_timeout,
    )?);
    let user_directory = Arc::new(HttpUserDirectory::new(
        &config.user_service_url,
        config.upstream_timeout,
    )?);

    // Bootstrap the signing key eagerly so a misconfigured or unreachable
    // configuration service fails startup instead of the first login
    let key_store = Arc::new(KeyStore::new(config_store, config.upstream_timeout));

    info!("Bootstrapping signing key...");
    key_store.ensure_ready().await.map_err(|e| {
        error!("Failed to bootstrap signing key: {}", e);
        e
    })?;
    info!("Signing key ready");

    // Create application state
    let state = Arc::new(AppState {
        orchestrator: AuthOrchestrator::new(key_store, user_directory),
        metrics,
    });

    // Build application routes
    let app = routes::build_routes(state);

    // Parse bind address
    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Authentication service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
