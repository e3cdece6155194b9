/// Default API root for the public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Gemini connection settings loaded from environment variables.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API credential. `None` when `GEMINI_API_KEY` is unset or blank;
    /// every analysis then fails with a configuration error.
    pub api_key: Option<String>,
    /// API root without a trailing slash.
    pub base_url: String,
    pub model: String,
}

impl GeminiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                                             |
    /// |-------------------|-----------------------------------------------------|
    /// | `GEMINI_API_KEY`  | unset                                               |
    /// | `GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta`  |
    /// | `GEMINI_MODEL`    | `gemini-2.5-flash-preview-05-20`                    |
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Self::new(api_key, base_url, model)
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            model: model.into(),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// `generateContent` URL for the configured model, without the key.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

// The credential must never end up in logs.
impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}
