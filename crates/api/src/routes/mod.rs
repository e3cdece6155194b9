pub mod health;
pub mod page;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /analyze                                         analyze one action (POST)
/// /catalog                                         active schema catalog (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(handlers::analysis::analyze))
        .route("/catalog", get(handlers::catalog::get_catalog))
}
