//! Cookie-keyed browser sessions.
//!
//! Every browser gets its own [`SessionContext`]; nothing is shared between
//! sessions. The context sits behind an async mutex that handlers hold for
//! the whole analysis, so a session has at most one request in flight.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::FromRequestParts;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use dbimpact_core::page::SessionContext;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::state::AppState;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "dbimpact_session";

struct SessionEntry {
    context: Arc<Mutex<SessionContext>>,
    last_seen: Instant,
}

/// In-memory session registry.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Return the context for `id`, creating a new session when the id is
    /// missing or unknown. The boolean is `true` for a new session.
    pub async fn resolve(&self, id: Option<Uuid>) -> (Uuid, Arc<Mutex<SessionContext>>, bool) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        if let Some((id, entry)) = id.and_then(|id| sessions.get_mut(&id).map(|e| (id, e))) {
            entry.last_seen = now;
            return (id, Arc::clone(&entry.context), false);
        }

        let before = sessions.len();
        sessions.retain(|_, e| now.duration_since(e.last_seen) < self.idle_timeout);
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped idle sessions");
        }

        let id = Uuid::new_v4();
        let context = Arc::new(Mutex::new(SessionContext::new()));
        sessions.insert(
            id,
            SessionEntry {
                context: Arc::clone(&context),
                last_seen: now,
            },
        );
        tracing::debug!(session_id = %id, active = sessions.len(), "Session created");
        (id, context, true)
    }

    /// Number of sessions currently held, idle ones included.
    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Parse the session id out of the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
        .find_map(|value| Uuid::parse_str(value.trim()).ok())
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// The caller's session, created on first visit.
///
/// Handlers must attach [`Session::set_cookie`] to their response so a new
/// session id reaches the browser.
pub struct Session {
    pub id: Uuid,
    pub context: Arc<Mutex<SessionContext>>,
    pub is_new: bool,
}

impl Session {
    /// `Set-Cookie` header for a newly created session, `None` otherwise.
    pub fn set_cookie(&self) -> Option<[(axum::http::HeaderName, HeaderValue); 1]> {
        if !self.is_new {
            return None;
        }
        let cookie = format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.id);
        HeaderValue::from_str(&cookie).ok().map(|v| [(SET_COOKIE, v)])
    }
}

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = session_id_from_headers(&parts.headers);
        let (id, context, is_new) = state.sessions.resolve(requested).await;
        Ok(Session {
            id,
            context,
            is_new,
        })
    }
}
