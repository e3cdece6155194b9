use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Key of the schema catalog being served.
    pub catalog: String,
    /// Whether an API credential is configured.
    pub credential_configured: bool,
    /// Browser sessions held in memory.
    pub active_sessions: usize,
}

/// GET /health -- returns service health.
///
/// Reports `degraded` when no credential is configured: the page still
/// loads but every analysis fails.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credential_configured = state.config.gemini.has_credential();

    let status = if credential_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        catalog: state.catalog.key.clone(),
        credential_configured,
        active_sessions: state.sessions.active_count().await,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
