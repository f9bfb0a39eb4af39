//! IllicitExplorer API server binary entrypoint.

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use explorer_common::config::AppConfig;
use explorer_engine::enrich::Enricher;
use explorer_engine::store::AddressStore;

use explorer_api::routes::create_router;
use explorer_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("explorer_api=debug,explorer_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting IllicitExplorer API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Load the mock dataset; a missing or malformed file aborts startup
    let store = AddressStore::load(&config.data_file)?;

    // Build the enrichment service (providers without config stay disabled)
    let enricher = Enricher::from_config(&config)?;

    // Build application state
    let port = config.port;
    let state = AppState::new(store, enricher, config);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
