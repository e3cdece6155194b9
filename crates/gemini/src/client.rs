//! HTTP client for the Gemini `generateContent` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use dbimpact_core::analysis::{AnalysisRequest, AnalysisResult};
use dbimpact_core::prompt::build_prompt;
use dbimpact_core::schema::SchemaCatalog;

use crate::config::GeminiConfig;
use crate::envelope::{GenerateRequest, GenerateResponse};
use crate::error::AnalysisError;

/// Anything that can turn an action description into an analysis.
///
/// The page and JSON handlers depend on this trait rather than on
/// [`GeminiClient`] directly.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, action: &str) -> Result<AnalysisResult, AnalysisError>;
}

/// Gemini client bound to one schema catalog.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
    catalog: Arc<SchemaCatalog>,
}

impl GeminiClient {
    /// Create a client with a default [`reqwest::Client`] (no timeout).
    pub fn new(config: GeminiConfig, catalog: Arc<SchemaCatalog>) -> Self {
        Self::with_client(reqwest::Client::new(), config, catalog)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        config: GeminiConfig,
        catalog: Arc<SchemaCatalog>,
    ) -> Self {
        Self {
            client,
            config,
            catalog,
        }
    }

    /// Analyze one action description.
    ///
    /// Issues at most one POST. Fails without touching the network when
    /// the credential is missing or the action is blank.
    pub async fn analyze(&self, action: &str) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            AnalysisError::Configuration(
                "GEMINI_API_KEY is not set. The app cannot function without it.".to_string(),
            )
        })?;

        let request = AnalysisRequest::new(action)
            .map_err(|e| AnalysisError::InvalidRequest(e.to_string()))?;

        let prompt = build_prompt(&self.catalog, &request);
        let body = GenerateRequest::from_prompt(&prompt);

        tracing::debug!(
            catalog = %self.catalog.key,
            model = %self.config.model,
            action_len = action.len(),
            "Sending analysis request",
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let text = response.text().await?;
        let result = Self::extract_result(&text)?;

        tracing::info!(
            catalog = %self.catalog.key,
            impact_count = result.impact.len(),
            "Analysis completed",
        );

        Ok(result)
    }

    // ---- private helpers ----

    /// Turn a non-2xx response into [`AnalysisError::Network`] carrying the
    /// status and body text. The body is not parsed.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalysisError> {
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Gemini returned a non-success status");
            return Err(AnalysisError::Network {
                status: Some(status.as_u16()),
                detail,
            });
        }
        Ok(response)
    }

    /// Parse the envelope and the JSON document embedded in its first part.
    fn extract_result(body: &str) -> Result<AnalysisResult, AnalysisError> {
        let raw: serde_json::Value =
            serde_json::from_str(body).map_err(|e| AnalysisError::MalformedResponse {
                reason: format!("response body is not JSON: {e}"),
                diagnostic: None,
            })?;

        let envelope: GenerateResponse = match serde_json::from_value(raw.clone()) {
            Ok(envelope) => envelope,
            Err(e) => {
                return Err(AnalysisError::MalformedResponse {
                    reason: format!("unexpected envelope shape: {e}"),
                    diagnostic: Some(raw),
                })
            }
        };

        let Some(text) = envelope.first_text() else {
            return Err(AnalysisError::MalformedResponse {
                reason: "Received an empty or invalid response from the AI".to_string(),
                diagnostic: Some(raw),
            });
        };

        AnalysisResult::from_json(text).map_err(|e| {
            tracing::warn!(error = %e, "Model answer is not a valid analysis document");
            AnalysisError::MalformedResponse {
                reason: format!("embedded text is not a valid analysis: {e}"),
                diagnostic: Some(raw.clone()),
            }
        })
    }
}

#[async_trait]
impl Analyzer for GeminiClient {
    async fn analyze(&self, action: &str) -> Result<AnalysisResult, AnalysisError> {
        GeminiClient::analyze(self, action).await
    }
}
