#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use dbimpact_api::config::ServerConfig;
use dbimpact_api::router::build_app_router;
use dbimpact_api::session::SessionStore;
use dbimpact_api::state::AppState;
use dbimpact_api::view::PageRenderer;
use dbimpact_core::analysis::AnalysisResult;
use dbimpact_core::schema::{SchemaCatalog, DEFAULT_CATALOG_KEY};
use dbimpact_gemini::config::DEFAULT_MODEL;
use dbimpact_gemini::{AnalysisError, Analyzer, GeminiClient, GeminiConfig};

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(gemini: GeminiConfig) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        session_idle_secs: 3600,
        catalog_key: DEFAULT_CATALOG_KEY.to_string(),
        catalog_path: None,
        gemini,
    }
}

/// Build the full application router around the given analyzer.
///
/// Uses the same `build_app_router` as `main.rs` so tests exercise the
/// production middleware stack.
pub fn build_test_app(analyzer: Arc<dyn Analyzer>, gemini: GeminiConfig) -> Router {
    let config = test_config(gemini);
    let catalog = Arc::new(config.load_catalog().unwrap());

    let state = AppState {
        config: Arc::new(config.clone()),
        catalog,
        analyzer,
        sessions: Arc::new(SessionStore::new(Duration::from_secs(3600))),
        pages: Arc::new(PageRenderer::new().unwrap()),
    };

    build_app_router(state, &config)
}

/// App backed by a [`MockAnalyzer`] and a configured (fake) credential.
pub fn build_mock_app(analyzer: Arc<MockAnalyzer>) -> Router {
    build_test_app(
        analyzer,
        GeminiConfig::new(Some("test-key".into()), "http://unused", DEFAULT_MODEL),
    )
}

/// App backed by a real [`GeminiClient`] pointed at `base_url`.
pub fn build_gemini_app(base_url: &str, api_key: Option<&str>) -> Router {
    let gemini = GeminiConfig::new(api_key.map(String::from), base_url, "test-model");
    let catalog = Arc::new(SchemaCatalog::builtin(DEFAULT_CATALOG_KEY).unwrap());
    let client = Arc::new(GeminiClient::new(gemini.clone(), catalog));
    build_test_app(client, gemini)
}

// ---------------------------------------------------------------------------
// Mock analyzer
// ---------------------------------------------------------------------------

/// Analyzer returning a fixed outcome and counting invocations.
pub struct MockAnalyzer {
    outcome: Box<dyn Fn() -> Result<AnalysisResult, AnalysisError> + Send + Sync>,
    pub calls: AtomicUsize,
}

impl MockAnalyzer {
    pub fn ok(json: &str) -> Arc<Self> {
        let result = AnalysisResult::from_json(json).unwrap();
        Arc::new(Self {
            outcome: Box::new(move || Ok(result.clone())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(make: impl Fn() -> AnalysisError + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            outcome: Box::new(move || Err(make())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, _action: &str) -> Result<AnalysisResult, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.outcome)()
    }
}

// ---------------------------------------------------------------------------
// Mock upstream
// ---------------------------------------------------------------------------

/// Local stand-in for the `generateContent` endpoint.
#[derive(Clone)]
pub struct Upstream {
    status: StatusCode,
    body: String,
    pub calls: Arc<AtomicUsize>,
    pub bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl Upstream {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn upstream_handler(State(up): State<Upstream>, body: Bytes) -> (StatusCode, String) {
    up.calls.fetch_add(1, Ordering::SeqCst);
    if let Ok(json) = serde_json::from_slice(&body) {
        up.bodies.lock().unwrap().push(json);
    }
    (up.status, up.body.clone())
}

/// Start a mock upstream answering every request with `status` and `body`.
/// Returns its base URL.
pub async fn spawn_upstream(status: StatusCode, body: String) -> (String, Upstream) {
    let upstream = Upstream {
        status,
        body,
        calls: Arc::new(AtomicUsize::new(0)),
        bodies: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .fallback(upstream_handler)
        .with_state(upstream.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1beta"), upstream)
}

/// Wrap model text in a `generateContent` response envelope.
pub fn envelope(text: &str) -> String {
    serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]}).to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

pub async fn post_form(app: Router, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` part of the response's `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let header = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    header.split(';').next().map(|s| s.trim().to_string())
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response.headers().get(LOCATION)?.to_str().ok()
}

/// Submit the analyze form for a session and return the rendered page.
pub async fn submit_and_render(app: &Router, action: &str, cookie: &str) -> String {
    let body = format!("action={}", form_encode(action));
    let response = post_form(app.clone(), "/analyze", &body, Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    body_text(get(app.clone(), "/", Some(cookie)).await).await
}

/// Open a fresh session and return its cookie.
pub async fn open_session(app: &Router) -> String {
    let response = get(app.clone(), "/", None).await;
    session_cookie(&response).expect("first visit must set a session cookie")
}

/// Minimal `application/x-www-form-urlencoded` encoding.
pub fn form_encode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}
