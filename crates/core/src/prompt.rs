//! System instruction and user turn sent to the model.
//!
//! The system instruction has three parts, in order: a domain-framing
//! paragraph, the serialized schema catalog, and the output contract the
//! response renderer relies on.

use crate::analysis::AnalysisRequest;
use crate::schema::SchemaCatalog;

/// Output contract appended to every system instruction.
const OUTPUT_CONTRACT: &str = r#"You MUST respond with ONLY a valid JSON object following this exact structure. Do not include markdown, code fences, comments, or any other text.
{
  "description": "A detailed paragraph summarizing the database operations. Explain what data is being read for validation or context, and what new data is being written or which fields are being updated. Be specific about the flow of operations and how it relates to the application's business logic. IMPORTANT: When you mention a field name from the schema, you MUST wrap it in double asterisks. For example: '...checks the **isActive** field...'.",
  "impact": [
    {
      "table": "CollectionName",
      "operation": "READ" | "WRITE" | "DELETE",
      "fields": ["field1", "field2"],
      "reason": "A concise explanation of why this operation occurs."
    }
  ]
}"#;

/// The two strings sent to the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_text: String,
}

/// Compose the prompt for one request against the given catalog.
pub fn build_prompt(catalog: &SchemaCatalog, request: &AnalysisRequest) -> Prompt {
    Prompt {
        system_instruction: system_instruction(catalog),
        user_text: request.action().to_string(),
    }
}

/// Build the system instruction for a catalog. Identical for every request
/// in a deployment.
pub fn system_instruction(catalog: &SchemaCatalog) -> String {
    let branding = &catalog.branding;
    let mut out = format!(
        "You are an expert {db} database analyst for the {app} application. \
         Your task is to analyze a user-described action and determine its impact \
         on the provided {db} collections.\n",
        db = branding.database_kind,
        app = branding.app_name,
    );

    if !catalog.domain_summary.is_empty() {
        out.push_str(&format!(
            "\nThe {} app is a platform where:\n",
            branding.app_name
        ));
        for line in &catalog.domain_summary {
            out.push_str("- ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&catalog.describe());
    out.push('\n');
    out.push_str(OUTPUT_CONTRACT);
    out
}
