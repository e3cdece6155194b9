//! Wire types for the `generateContent` request and response envelope.

use serde::{Deserialize, Serialize};

use dbimpact_core::prompt::Prompt;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    pub system_instruction: Content<'a>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
}

impl<'a> GenerateRequest<'a> {
    /// Request body forcing a JSON-typed answer.
    pub fn from_prompt(prompt: &'a Prompt) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: &prompt.user_text,
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: &prompt.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Outer response structure. Every level is optional so that shape
/// mismatches surface as `None` rather than as a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate's first part, if non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}
