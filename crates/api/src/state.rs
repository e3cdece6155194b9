use std::sync::Arc;

use dbimpact_core::schema::SchemaCatalog;
use dbimpact_gemini::Analyzer;

use crate::config::ServerConfig;
use crate::session::SessionStore;
use crate::view::PageRenderer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Schema catalog of this deployment.
    pub catalog: Arc<SchemaCatalog>,
    /// Model client used by the page and the JSON API.
    pub analyzer: Arc<dyn Analyzer>,
    /// Per-browser page state.
    pub sessions: Arc<SessionStore>,
    /// Compiled page template.
    pub pages: Arc<PageRenderer>,
}
