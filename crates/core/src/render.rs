//! Response renderer: turns an [`AnalysisResult`] into display fragments.
//!
//! The output is plain data. Escaping and markup are the page template's
//! job, so everything here is safe to produce from untrusted model text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::analysis::{AnalysisResult, ImpactEntry, Operation};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shown instead of cards when the model reports no impact.
pub const NO_IMPACT_NOTICE: &str =
    "The AI determined this action has no direct impact on the database.";

/// Caption used when an entry carries no reason.
pub const MISSING_REASON: &str = "No reason provided.";

/// Balanced `**text**` pairs. Unmatched markers never match and stay literal.
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"));

// ---------------------------------------------------------------------------
// Badge palette
// ---------------------------------------------------------------------------

/// Background and foreground colour of an operation badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub const READ_PALETTE: Palette = Palette {
    background: "#e0f2fe",
    foreground: "#0284c7",
};

pub const WRITE_PALETTE: Palette = Palette {
    background: "#d1fae5",
    foreground: "#059669",
};

pub const DELETE_PALETTE: Palette = Palette {
    background: "#fee2e2",
    foreground: "#dc2626",
};

/// Neutral style for unrecognised operations.
pub const FALLBACK_PALETTE: Palette = Palette {
    background: "#e5e7eb",
    foreground: "#4b5563",
};

/// Palette for an operation. Total over every input.
pub fn palette_for(operation: &Operation) -> Palette {
    match operation {
        Operation::Read => READ_PALETTE,
        Operation::Write => WRITE_PALETTE,
        Operation::Delete => DELETE_PALETTE,
        Operation::Other(_) => FALLBACK_PALETTE,
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// A run of description text, either plain or emphasised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum InlineSpan {
    Text(String),
    Strong(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub palette: Palette,
}

/// Card for one impact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactCard {
    pub title: String,
    pub badge: Badge,
    pub reason: String,
    /// One tag per field, in input order.
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImpactSection {
    Notice(String),
    Cards(Vec<ImpactCard>),
}

/// Everything the results area displays for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAnalysis {
    pub heading: String,
    pub description: Vec<InlineSpan>,
    pub impacts: ImpactSection,
}

impl RenderedAnalysis {
    /// Cards in display order; empty when the notice is shown.
    pub fn cards(&self) -> &[ImpactCard] {
        match &self.impacts {
            ImpactSection::Cards(cards) => cards,
            ImpactSection::Notice(_) => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render_analysis(action: &str, result: &AnalysisResult) -> RenderedAnalysis {
    let impacts = if result.impact.is_empty() {
        ImpactSection::Notice(NO_IMPACT_NOTICE.to_string())
    } else {
        ImpactSection::Cards(result.impact.iter().map(render_card).collect())
    };

    RenderedAnalysis {
        heading: format!("Analysis for: \"{action}\""),
        description: parse_emphasis(&result.description),
        impacts,
    }
}

fn render_card(entry: &ImpactEntry) -> ImpactCard {
    let reason = if entry.reason.trim().is_empty() {
        MISSING_REASON.to_string()
    } else {
        entry.reason.clone()
    };

    ImpactCard {
        title: entry.table.clone(),
        badge: Badge {
            label: entry.operation.label(),
            palette: palette_for(&entry.operation),
        },
        reason,
        tags: entry.fields.clone(),
    }
}

/// Split text on balanced `**` pairs.
///
/// Markers without a partner, and empty pairs such as `****`, are left in
/// the plain text untouched.
pub fn parse_emphasis(text: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in EMPHASIS_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(InlineSpan::Text(text[cursor..whole.start()].to_string()));
        }
        spans.push(InlineSpan::Strong(inner.as_str().to_string()));
        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(InlineSpan::Text(text[cursor..].to_string()));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
