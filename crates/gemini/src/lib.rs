//! Client for the Gemini `generateContent` endpoint.
//!
//! [`GeminiClient::analyze`] sends one action description plus the
//! deployment's schema catalog to the model and returns a parsed
//! [`AnalysisResult`](dbimpact_core::analysis::AnalysisResult) or a tagged
//! [`AnalysisError`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;

pub use client::{Analyzer, GeminiClient};
pub use config::GeminiConfig;
pub use error::AnalysisError;
