use std::path::PathBuf;

use dbimpact_core::error::CoreError;
use dbimpact_core::schema::{SchemaCatalog, DEFAULT_CATALOG_KEY};
use dbimpact_gemini::GeminiConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`). Covers the
    /// upstream model call, which has no timeout of its own.
    pub request_timeout_secs: u64,
    /// Sessions idle for longer than this are dropped (default: `3600`).
    pub session_idle_secs: u64,
    /// Built-in catalog to serve (default: `10d-stores`).
    pub catalog_key: String,
    /// Optional JSON catalog file; takes precedence over `catalog_key`.
    pub catalog_path: Option<PathBuf>,
    /// Gemini connection settings.
    pub gemini: GeminiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `SESSION_IDLE_SECS`    | `3600`                     |
    /// | `SCHEMA_CATALOG`       | `10d-stores`               |
    /// | `SCHEMA_CATALOG_PATH`  | unset                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let session_idle_secs: u64 = std::env::var("SESSION_IDLE_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_IDLE_SECS must be a valid u64");

        let catalog_key =
            std::env::var("SCHEMA_CATALOG").unwrap_or_else(|_| DEFAULT_CATALOG_KEY.into());

        let catalog_path = std::env::var("SCHEMA_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let gemini = GeminiConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            session_idle_secs,
            catalog_key,
            catalog_path,
            gemini,
        }
    }

    /// Resolve the configured schema catalog.
    pub fn load_catalog(&self) -> Result<SchemaCatalog, CoreError> {
        match &self.catalog_path {
            Some(path) => SchemaCatalog::from_file(path),
            None => SchemaCatalog::builtin(&self.catalog_key),
        }
    }
}
