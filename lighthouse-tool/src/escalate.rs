//! `escalate_to_human` — record a structured ticket draft for unanswerable
//! questions (`spec.md` §4.3).
//!
//! Unlike the other three tools this one does not terminate the loop: it
//! validates the draft's shape, stores it into the per-request
//! [`ToolContext::escalation`] slot, and returns a confirmation string the
//! model sees like any other tool result. The loop driver inspects the
//! slot after the turn completes.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolDyn;
use lighthouse_types::EscalationDraft;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

/// Validates and stores an escalation draft.
pub struct EscalateToHumanTool;

impl ToolDyn for EscalateToHumanTool {
    fn name(&self) -> &str {
        "escalate_to_human"
    }

    fn description(&self) -> &str {
        "Creates a support ticket draft for a question the help articles \
         can't answer. Use only after knowledge_base and either \
         fetch_articles or search_articles have both been tried."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "request_type": {
                    "type": "string",
                    "enum": ["feature_request", "bug_report", "clarification_needed"],
                },
                "problem_statement": {"type": "string"},
                "suggested_docs": {"type": "array", "items": {"type": "string"}},
            },
            "required": ["title", "request_type", "problem_statement"],
            "additionalProperties": false,
        })
    }

    fn call<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            let draft: EscalationDraft = serde_json::from_value(input)
                .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

            if draft.title.trim().is_empty() {
                return Err(ToolError::InvalidInput("title must not be empty".to_string()));
            }
            if draft.problem_statement.trim().is_empty() {
                return Err(ToolError::InvalidInput(
                    "problem_statement must not be empty".to_string(),
                ));
            }

            let confirmation = format!("Escalation draft recorded: \"{}\"", draft.title);
            *ctx.escalation.lock().await = Some(draft);
            Ok(confirmation)
        })
    }
}
