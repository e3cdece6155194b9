//! Handlers for the single analyzer page.
//!
//! The page follows post/redirect/get: form submissions update the
//! caller's session and redirect back to `GET /`, which renders whatever
//! the session currently holds.

use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use dbimpact_core::page::FailureNotice;
use serde::Deserialize;

use crate::error::AppResult;
use crate::session::Session;
use crate::state::AppState;

/// Body of the analyze form.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub action: String,
}

/// GET /
///
/// Render the page for the caller's session.
pub async fn show_page(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<impl IntoResponse> {
    let html = {
        let ctx = session.context.lock().await;
        state.pages.render(&state.catalog, &ctx)?
    };

    Ok((session.set_cookie(), Html(html)))
}

/// POST /analyze
///
/// Run one analysis for the submitted action. The session lock is held
/// until the analyzer returns, so a session never has two requests in
/// flight. Blank input leaves the session untouched.
pub async fn submit_analysis(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AnalyzeForm>,
) -> impl IntoResponse {
    let mut ctx = session.context.lock().await;

    match ctx.begin(&form.action) {
        None => {
            tracing::debug!(session_id = %session.id, "Ignoring blank action");
        }
        Some(request) => {
            let outcome = state
                .analyzer
                .analyze(request.action())
                .await
                .map_err(|err| {
                    tracing::warn!(
                        session_id = %session.id,
                        code = err.code(),
                        error = %err,
                        "Analysis failed",
                    );
                    FailureNotice::from(&err)
                });

            if let Ok(result) = &outcome {
                tracing::info!(
                    session_id = %session.id,
                    impact_count = result.impact.len(),
                    "Analysis displayed",
                );
            }
            ctx.finish(outcome);
        }
    }
    drop(ctx);

    (session.set_cookie(), Redirect::to("/"))
}

/// POST /reset
///
/// Clear the input and any displayed result.
pub async fn reset(session: Session) -> impl IntoResponse {
    session.context.lock().await.reset();
    (session.set_cookie(), Redirect::to("/"))
}
