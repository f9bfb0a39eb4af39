//! Star-graph route around a queried address.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use explorer_common::types::AddressGraph;
use explorer_engine::query::QueryService;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/graph/{addr}", get(get_graph))
}

/// GET /graph/:addr — Nodes and transfer edges around the address.
///
/// Unknown addresses get a synthesized center node, so this endpoint never
/// 404s.
async fn get_graph(State(state): State<AppState>, Path(addr): Path<String>) -> Json<AddressGraph> {
    Json(QueryService::build_graph(&state.store, &addr))
}
