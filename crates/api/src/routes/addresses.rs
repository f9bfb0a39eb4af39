//! Address listing and detail routes.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use explorer_common::error::AppError;
use explorer_common::types::{AddressRecord, EnrichedAddress};
use explorer_engine::query::QueryService;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list_addresses))
        .route("/address/{addr}", get(get_address))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    tag: Option<String>,
}

#[derive(Debug, Serialize)]
struct AddressList {
    count: usize,
    results: Vec<AddressRecord>,
}

/// GET /addresses?tag= — List the dataset, optionally filtered by tag.
async fn list_addresses(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<AddressList> {
    // An empty ?tag= means "no filter", same as omitting it
    let tag = params.tag.as_deref().filter(|t| !t.is_empty());
    let results: Vec<AddressRecord> = state.store.list(tag).into_iter().cloned().collect();

    Json(AddressList {
        count: results.len(),
        results,
    })
}

/// GET /address/:addr — Resolve one address (exact, then substring) and
/// attach best-effort enrichment from both providers.
async fn get_address(
    State(state): State<AppState>,
    Path(addr): Path<String>,
) -> Result<Json<EnrichedAddress>, AppError> {
    let detail = QueryService::get_address_detail(&state.store, &state.enricher, &addr).await?;
    Ok(Json(detail))
}
