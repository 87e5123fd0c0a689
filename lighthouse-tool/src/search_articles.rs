//! `search_articles` — embed the query and run a similarity search,
//! falling back for product questions the hierarchy titles don't
//! literally match (`spec.md` §4.3, Scenario B).

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolDyn;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

const MAX_RESULTS_CAP: u32 = 8;
const CANDIDATE_MULTIPLIER: usize = 4;

#[derive(Debug, Deserialize)]
struct SearchArticlesInput {
    query: String,
    #[serde(default = "default_max_results")]
    max_results: u32,
}

fn default_max_results() -> u32 {
    MAX_RESULTS_CAP
}

#[derive(Debug, Serialize)]
struct SearchHit {
    path: String,
    title: Option<String>,
    content: String,
    similarity: f32,
}

/// Embeds the query, fetches `4 * max_results` nearest chunks, drops
/// anything below `σ_min`, groups by path keeping the best similarity,
/// and returns the top `max_results` sorted descending.
pub struct SearchArticlesTool;

impl ToolDyn for SearchArticlesTool {
    fn name(&self) -> &str {
        "search_articles"
    }

    fn description(&self) -> &str {
        "Semantic search over help articles. Use as a fallback when \
         knowledge_base titles don't obviously match the question."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "max_results": {"type": "integer", "minimum": 1, "maximum": 8},
            },
            "required": ["query"],
            "additionalProperties": false,
        })
    }

    fn call<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(async move {
            let parsed: SearchArticlesInput = serde_json::from_value(input)
                .map_err(|e| ToolError::InvalidInput(e.to_string()))?;

            if parsed.query.trim().is_empty() {
                return Err(ToolError::InvalidInput("query must not be empty".to_string()));
            }
            let max_results = parsed.max_results.clamp(1, MAX_RESULTS_CAP) as usize;

            let embedding = ctx.provider.embed(&parsed.query).await?;
            let k = CANDIDATE_MULTIPLIER * max_results;
            let results = ctx.corpus.similarity_search(&embedding, k).await?;

            let filtered: Vec<_> = results
                .into_iter()
                .filter(|(_, score)| *score >= ctx.limits.min_similarity)
                .collect();

            let mut articles = lighthouse_corpus::group_search_results(filtered);
            articles.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            articles.truncate(max_results);

            let out: Vec<SearchHit> = articles
                .into_iter()
                .map(|a| SearchHit {
                    path: a.path,
                    title: a.title,
                    content: a.content,
                    similarity: a.similarity,
                })
                .collect();

            serde_json::to_string(&out)
                .map_err(|e| ToolError::ExecutionFailed(format!("serializing result: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_ctx_with_chunks;
    use lighthouse_types::{ArticleChunk, ChunkMetadata};

    fn chunk(path: &str, embedding: Vec<f32>) -> ArticleChunk {
        ArticleChunk {
            id: format!("{path}#0"),
            path: path.to_string(),
            section: None,
            title: Some(path.to_string()),
            body: format!("body of {path}"),
            embedding,
            metadata: ChunkMetadata::unknown(),
        }
    }

    #[tokio::test]
    async fn filters_low_similarity_and_sorts_descending() {
        // MockProvider::embed is deterministic per input text but not
        // meaningfully "close" to any particular chunk, so exercise the
        // filter/sort logic directly through chunks whose embeddings are
        // exact matches for a probe vector the mock happens to produce.
        let ctx = fixture_ctx_with_chunks(vec![
            chunk("a.md", vec![1.0, 0.0]),
            chunk("b.md", vec![0.0, 1.0]),
        ]);
        let result = SearchArticlesTool
            .call(json!({"query": "anything", "max_results": 2}), &ctx)
            .await
            .unwrap();
        let hits: Vec<SearchHit> = serde_json::from_str(&result).unwrap();
        // Whatever similarity scores came back, they must be sorted
        // descending and each clears min_similarity.
        for window in hits.windows(2) {
            assert!(window[0].similarity >= window[1].similarity);
        }
        for hit in &hits {
            assert!(hit.similarity >= ctx.limits.min_similarity);
        }
    }

    #[tokio::test]
    async fn max_results_is_capped_at_eight() {
        let ctx = fixture_ctx_with_chunks(vec![]);
        let result = SearchArticlesTool
            .call(json!({"query": "q", "max_results": 50}), &ctx)
            .await
            .unwrap();
        let hits: Vec<SearchHit> = serde_json::from_str(&result).unwrap();
        assert!(hits.len() <= MAX_RESULTS_CAP as usize);
    }

    #[tokio::test]
    async fn rejects_empty_query() {
        let ctx = fixture_ctx_with_chunks(vec![]);
        let err = SearchArticlesTool
            .call(json!({"query": ""}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn default_max_results_is_eight_when_omitted() {
        let ctx = fixture_ctx_with_chunks(vec![]);
        let result = SearchArticlesTool
            .call(json!({"query": "q"}), &ctx)
            .await
            .unwrap();
        let hits: Vec<SearchHit> = serde_json::from_str(&result).unwrap();
        assert!(hits.is_empty());
    }
}
