use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dbimpact_api::config::ServerConfig;
use dbimpact_api::router::build_app_router;
use dbimpact_api::session::SessionStore;
use dbimpact_api::state::AppState;
use dbimpact_api::view::PageRenderer;
use dbimpact_gemini::GeminiClient;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dbimpact_api=debug,dbimpact_gemini=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Schema catalog ---
    let catalog = Arc::new(config.load_catalog().expect("Failed to load schema catalog"));
    tracing::info!(
        catalog = %catalog.key,
        collections = catalog.collections.len(),
        "Schema catalog loaded",
    );

    // --- Model client ---
    if !config.gemini.has_credential() {
        // Not fatal: the page is served and each analysis reports the problem.
        tracing::warn!("GEMINI_API_KEY is not set; every analysis will fail");
    }
    let analyzer = Arc::new(GeminiClient::new(config.gemini.clone(), Arc::clone(&catalog)));
    tracing::info!(model = %config.gemini.model, "Gemini client created");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        catalog,
        analyzer,
        sessions: Arc::new(SessionStore::new(Duration::from_secs(config.session_idle_secs))),
        pages: Arc::new(PageRenderer::new().expect("Failed to compile page template")),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
