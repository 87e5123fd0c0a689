//! `knowledge_base` — no-input tool returning the cached hierarchy
//! manifest. The intended first call for any product question
//! (`spec.md` §4.3).

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolDyn;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

/// Returns the current article hierarchy as a string, for the model to
/// browse before deciding which articles to fetch or search for.
pub struct KnowledgeBaseTool;

impl ToolDyn for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> &str {
        "Returns the current help article hierarchy (sections and titles). \
         Call this first for any product question to see what topics exist \
         before fetching or searching specific articles."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false,
        })
    }

    fn call<'a>(
        &'a self,
        _input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(async move { Ok(ctx.manifest.get_hierarchy().await) })
    }
}
