//! `fetch_articles` — resolve a batch of GitHub-blob/raw URLs (or bare
//! corpus paths) to full article text (`spec.md` §4.3).

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolDyn;
use lighthouse_types::rewrite_to_path;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Deserialize)]
struct FetchArticlesInput {
    paths: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FetchedArticle {
    path: String,
    title: Option<String>,
    content: String,
}

/// Maps each input URL/path to a corpus path, fetches the matching
/// chunks, and returns their grouped article text as a JSON array.
///
/// The agent system prompt instructs the model to call this exactly once
/// per request with the union of relevant URLs; this tool does not
/// itself enforce "exactly once" — that invariant belongs to the agent
/// loop (`spec.md` §4.4), which this tool has no visibility into.
pub struct FetchArticlesTool;

impl ToolDyn for FetchArticlesTool {
    fn name(&self) -> &str {
        "fetch_articles"
    }

    fn description(&self) -> &str {
        "Fetches the full text of specific help articles by URL or path. \
         Call once per request with every URL you need, up to 15."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paths": {
                    "type": "array",
                    "items": {"type": "string"},
                    "maxItems": 15,
                },
            },
            "required": ["paths"],
            "additionalProperties": false,
        })
    }

    fn call<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            let parsed: FetchArticlesInput = serde_json::from_value(input)
                .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

            if parsed.paths.is_empty() {
                return Err(ToolError::InvalidInput("paths must not be empty".to_string()));
            }
            if parsed.paths.len() > ctx.limits.max_fetch_paths {
                return Err(ToolError::InvalidInput(format!(
                    "paths has {} entries, max is {}",
                    parsed.paths.len(),
                    ctx.limits.max_fetch_paths
                )));
            }

            let rewritten: BTreeSet<String> =
                parsed.paths.iter().map(|p| rewrite_to_path(p)).collect();

            let chunks = ctx.corpus.fetch_by_paths(&rewritten).await?;
            let articles = lighthouse_corpus::group_into_articles(chunks);

            let out: Vec<FetchedArticle> = articles
                .into_iter()
                .map(|a| FetchedArticle {
                    path: a.path,
                    title: a.title,
                    content: a.content,
                })
                .collect();

            serde_json::to_string(&out)
                .map_err(|e| ToolError::ExecutionFailed(format!("serializing result: {e}")))
        })
    }
}
