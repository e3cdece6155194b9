use axum::routing::{get, post};
use axum::Router;

use crate::handlers::page;
use crate::state::AppState;

/// Mount the browser page routes at the root.
///
/// ```text
/// GET  /          the page
/// POST /analyze   form submit
/// POST /reset     clear the session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page::show_page))
        .route("/analyze", post(page::submit_analysis))
        .route("/reset", post(page::reset))
}
