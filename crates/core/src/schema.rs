//! Schema catalogs handed to the model as grounding context.
//!
//! Each deployment of the analyzer differs only in the catalog it ships
//! with: the collections and fields of the target database plus the
//! branding strings shown on the page and injected into the prompt.
//! Built-in catalogs are embedded at compile time; a deployment can also
//! load its own from a JSON file.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Key of the catalog used when no selection is configured.
pub const DEFAULT_CATALOG_KEY: &str = "10d-stores";

/// Built-in catalogs as `(key, json)` pairs.
const BUILTIN_CATALOGS: &[(&str, &str)] = &[
    ("10d-stores", include_str!("../catalogs/10d-stores.json")),
    ("10d-stores-admin", include_str!("../catalogs/10d-stores-admin.json")),
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Deployment-specific presentation strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    /// Product name, e.g. `10D Stores`.
    pub app_name: String,
    /// Emoji or short glyph shown next to the title.
    #[serde(default)]
    pub icon: String,
    /// One-sentence explanation shown under the page title.
    pub tagline: String,
    /// Database technology named in the prompt, e.g. `Firestore`.
    pub database_kind: String,
    /// Example actions shown in the empty text area.
    #[serde(default)]
    pub placeholder: String,
}

/// A single collection (or table) and its fields, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionDef {
    pub name: String,
    /// How documents in this collection are keyed.
    pub document_id: String,
    pub fields: Vec<String>,
}

/// The static description of a target database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    pub key: String,
    pub branding: Branding,
    /// Bullet points describing what the application does.
    #[serde(default)]
    pub domain_summary: Vec<String>,
    pub collections: Vec<CollectionDef>,
}

impl SchemaCatalog {
    /// Look up one of the catalogs compiled into the binary.
    pub fn builtin(key: &str) -> Result<Self, CoreError> {
        let (_, json) = BUILTIN_CATALOGS
            .iter()
            .find(|(k, _)| *k == key)
            .ok_or_else(|| CoreError::UnknownCatalog(key.to_string()))?;
        Self::from_json(json)
    }

    /// Keys of every built-in catalog.
    pub fn builtin_keys() -> Vec<&'static str> {
        BUILTIN_CATALOGS.iter().map(|(k, _)| *k).collect()
    }

    /// Parse and validate a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file on disk.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoreError::InvalidCatalog(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.key.trim().is_empty() {
            return Err(CoreError::InvalidCatalog("key must not be empty".into()));
        }
        if self.collections.is_empty() {
            return Err(CoreError::InvalidCatalog(format!(
                "catalog '{}' declares no collections",
                self.key
            )));
        }
        if let Some(c) = self.collections.iter().find(|c| c.name.trim().is_empty()) {
            return Err(CoreError::InvalidCatalog(format!(
                "catalog '{}' has a collection without a name (document id {})",
                self.key, c.document_id
            )));
        }
        Ok(())
    }

    /// Serialize the catalog into the plain-text block embedded in the
    /// system instruction.
    ///
    /// ```text
    /// 10D Stores Firestore Database Schema:
    ///
    /// 1. users (Document ID: userId)
    ///    - uid, email, displayName
    /// ```
    pub fn describe(&self) -> String {
        let mut out = format!(
            "{} {} Database Schema:\n",
            self.branding.app_name, self.branding.database_kind
        );
        for (i, collection) in self.collections.iter().enumerate() {
            // Writing to a String cannot fail.
            let _ = write!(
                out,
                "\n{}. {} (Document ID: {})\n   - {}\n",
                i + 1,
                collection.name,
                collection.document_id,
                collection.fields.join(", ")
            );
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
