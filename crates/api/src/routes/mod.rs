pub mod addresses;
pub mod export;
pub mod frontend;
pub mod graph;
pub mod health;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the complete API router with all routes.
///
/// Unmatched paths fall through to the frontend handler, which serves the
/// bundled SPA entry file (or a build hint when it is absent).
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(addresses::router())
        .merge(export::router())
        .merge(graph::router())
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(frontend::serve_frontend)
        .with_state(state)
}
