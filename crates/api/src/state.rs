//! Shared application state for the Axum API server.

use std::sync::Arc;

use explorer_common::config::AppConfig;
use explorer_engine::enrich::Enricher;
use explorer_engine::store::AddressStore;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AddressStore>,
    pub enricher: Arc<Enricher>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: AddressStore, enricher: Enricher, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            enricher: Arc::new(enricher),
            config,
        }
    }
}
