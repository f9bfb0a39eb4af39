//! Dataset export routes.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use explorer_common::error::AppError;
use explorer_common::types::AddressRecord;
use explorer_engine::query::QueryService;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/export/json", get(export_json))
        .route("/export/csv", get(export_csv))
}

/// GET /export/json — The full dataset as a bare JSON array.
async fn export_json(State(state): State<AppState>) -> Json<Vec<AddressRecord>> {
    Json(state.store.records().to_vec())
}

/// GET /export/csv — The full dataset flattened to a CSV attachment.
async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = QueryService::export_csv(&state.store)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"addresses.csv\"",
            ),
        ],
        csv,
    ))
}
