use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dbimpact_gemini::AnalysisError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failed analysis from the model client.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// The page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut diagnostic = None;

        let (status, code, message) = match &self {
            // --- Analysis failures ---
            AppError::Analysis(err) => match err {
                AnalysisError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Analyzer is not configured");
                    (StatusCode::SERVICE_UNAVAILABLE, err.code(), err.to_string())
                }
                AnalysisError::InvalidRequest(_) => {
                    (StatusCode::BAD_REQUEST, err.code(), err.to_string())
                }
                AnalysisError::Network { .. } => {
                    tracing::warn!(error = %err, "Upstream call failed");
                    (StatusCode::BAD_GATEWAY, err.code(), err.to_string())
                }
                AnalysisError::MalformedResponse { .. } => {
                    tracing::warn!(error = %err, "Upstream answer could not be parsed");
                    diagnostic = err.diagnostic().cloned();
                    (StatusCode::BAD_GATEWAY, err.code(), err.to_string())
                }
                AnalysisError::Unexpected(msg) => {
                    tracing::error!(error = %msg, "Unexpected analysis error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        err.code(),
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Template(err) => {
                tracing::error!(error = %err, "Template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(diagnostic) = diagnostic {
            body["diagnostic"] = diagnostic;
        }

        (status, axum::Json(body)).into_response()
    }
}
