use dotenvy::dotenv;
use sigecon_core::observability::logging::init_tracing;
use sigecon_frontend::config::get_configuration;
use sigecon_frontend::services::{api_client::ApiClient, extractor_client::ExtractorClient};
use sigecon_frontend::startup::build_router;
use sigecon_frontend::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    // Initialize tracing using shared logic
    init_tracing(
        "sigecon-frontend",
        "info",
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    sigecon_frontend::services::metrics::init_metrics();

    let api = Arc::new(ApiClient::new(configuration.backend.clone()));
    let extractor = Arc::new(ExtractorClient::new(configuration.extractor.clone()));

    let app = build_router(AppState::new(api, extractor));

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting sigecon-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
