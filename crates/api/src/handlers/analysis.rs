//! JSON analysis endpoint for non-browser callers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use dbimpact_core::analysis::AnalysisResult;
use dbimpact_core::render::{render_analysis, RenderedAnalysis};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeInput {
    pub action: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    /// The model's answer as parsed.
    pub result: AnalysisResult,
    /// Display fragments for the answer.
    pub rendered: RenderedAnalysis,
}

/// POST /api/v1/analyze
///
/// Analyze one action and return both the parsed result and its rendering.
/// Stateless: no session is read or written.
pub async fn analyze(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeInput>,
) -> AppResult<impl IntoResponse> {
    if input.action.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Action description must not be empty".into(),
        ));
    }

    let result = state.analyzer.analyze(&input.action).await?;
    let rendered = render_analysis(&input.action, &result);

    tracing::info!(impact_count = result.impact.len(), "API analysis completed");

    Ok(Json(DataResponse {
        data: AnalyzeOutput { result, rendered },
    }))
}
