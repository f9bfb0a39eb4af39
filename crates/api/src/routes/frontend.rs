//! SPA fallback — serves the bundled frontend entry file for client-side
//! routing.

use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;

use explorer_common::error::AppError;

use crate::state::AppState;

/// Fallback handler for every path no explicit route matched.
///
/// Paths under the API namespaces stay 404s; anything else gets the built
/// frontend's `index.html` so client-side routing works, or a build hint
/// when no bundle is present.
pub async fn serve_frontend(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');
    if path.starts_with("api/") || path.starts_with("addresses") || path.starts_with("export") {
        return AppError::NotFound("Not found".to_string()).into_response();
    }

    let index = std::path::Path::new(&state.config.static_dir).join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => Json(json!({
            "message": "Frontend not built yet. Run 'npm run build:deploy' in the frontend folder."
        }))
        .into_response(),
    }
}
