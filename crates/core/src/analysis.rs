//! Analysis request and result types.
//!
//! [`AnalysisResult`] is the shape the model is instructed to answer with.
//! Parsing is all-or-nothing: a result either deserializes completely or
//! the caller treats the answer as malformed. Within an entry only `table`
//! is required; `null` or absent optional values fall back to defaults.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A user-supplied description of an application action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    action: String,
}

impl AnalysisRequest {
    /// Build a request, rejecting empty or whitespace-only text.
    ///
    /// The text is kept verbatim (no trimming) since it is forwarded to
    /// the model as-is.
    pub fn new(action: impl Into<String>) -> Result<Self, CoreError> {
        let action = action.into();
        if action.trim().is_empty() {
            return Err(CoreError::Validation(
                "Action description must not be empty".to_string(),
            ));
        }
        Ok(Self { action })
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// Label shown when an entry names no operation.
pub const MISSING_OPERATION: &str = "N/A";

/// Kind of database access claimed by an impact entry.
///
/// Parsed case-insensitively. Values outside READ/WRITE/DELETE are kept
/// verbatim in [`Operation::Other`]. An entry without an operation gets
/// [`MISSING_OPERATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
    Delete,
    Other(String),
}

impl Operation {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "READ" => Self::Read,
            "WRITE" => Self::Write,
            "DELETE" => Self::Delete,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn missing() -> Self {
        Self::Other(MISSING_OPERATION.to_string())
    }

    /// Uppercased label used on badges.
    pub fn label(&self) -> String {
        match self {
            Self::Read => "READ".to_string(),
            Self::Write => "WRITE".to_string(),
            Self::Delete => "DELETE".to_string(),
            Self::Other(raw) => raw.to_uppercase(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Other(raw) => serializer.serialize_str(raw),
            known => serializer.serialize_str(&known.label()),
        }
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// One database operation the model attributes to the described action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactEntry {
    /// Collection or table name.
    pub table: String,
    #[serde(default = "Operation::missing", deserialize_with = "operation_or_missing")]
    pub operation: Operation,
    /// Affected fields, in the order returned. Duplicates are kept.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn operation_or_missing<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Operation, D::Error> {
    Ok(Option::<Operation>::deserialize(deserializer)?.unwrap_or_else(Operation::missing))
}

/// The model's full answer for one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Narrative with field names wrapped in `**` markers.
    pub description: String,
    pub impact: Vec<ImpactEntry>,
}

impl AnalysisResult {
    /// Parse the JSON text produced by the model.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
