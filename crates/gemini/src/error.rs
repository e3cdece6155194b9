use dbimpact_core::page::FailureNotice;

/// Failure of a single analysis attempt.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The deployment is missing required configuration (the API key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The action text was empty.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failure (`status` is `None`) or a non-2xx response.
    #[error("Network error calling the API{}: {detail}", status_suffix(.status))]
    Network { status: Option<u16>, detail: String },

    /// The envelope or the embedded JSON did not have the expected shape.
    #[error("Error parsing the API response: {reason}")]
    MalformedResponse {
        reason: String,
        /// Raw envelope, when it was at least valid JSON.
        diagnostic: Option<serde_json::Value>,
    },

    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl AnalysisError {
    /// Stable code used in JSON error bodies and on the page.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    pub fn diagnostic(&self) -> Option<&serde_json::Value> {
        match self {
            Self::MalformedResponse { diagnostic, .. } => diagnostic.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        let err = err.without_url();
        if err.is_builder() {
            Self::Unexpected(err.to_string())
        } else {
            Self::Network {
                status: err.status().map(|s| s.as_u16()),
                detail: err.to_string(),
            }
        }
    }
}

impl From<&AnalysisError> for FailureNotice {
    fn from(err: &AnalysisError) -> Self {
        let message = match err {
            AnalysisError::MalformedResponse { .. } => {
                format!("{err}. The AI might have returned an unexpected format.")
            }
            other => other.to_string(),
        };
        Self {
            code: err.code().to_string(),
            message,
            diagnostic: err
                .diagnostic()
                .and_then(|v| serde_json::to_string_pretty(v).ok()),
        }
    }
}
