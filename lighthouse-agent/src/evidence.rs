//! Collected evidence: the deduplicated set of articles accumulated
//! across every `fetch_articles` / `search_articles` call in one request
//! (`spec.md` §3, §4.4).

use lighthouse_types::{Article, ChunkMetadata, EscalationDraft};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Shape `fetch_articles` and `search_articles` serialize their results
/// into. Fields beyond `path`/`title`/`content` are optional so one type
/// parses both tools' output — `fetch_articles` omits `similarity`
/// (treated as `1.0`, a direct fetch), `search_articles` always includes
/// it.
#[derive(Debug, Deserialize)]
struct RawHit {
    path: String,
    title: Option<String>,
    content: String,
    #[serde(default = "default_similarity")]
    similarity: f32,
}

fn default_similarity() -> f32 {
    1.0
}

/// Per-request accumulator for tool results and an optional escalation
/// draft, keyed by article path so repeat mentions of the same article
/// collapse (`spec.md` glossary: "Collected evidence").
#[derive(Debug, Clone, Default)]
pub struct EvidenceSink {
    articles: BTreeMap<String, Article>,
    /// The escalation draft, if `escalate_to_human` was called.
    pub escalation: Option<EscalationDraft>,
}

impl EvidenceSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `fetch_articles`/`search_articles` JSON result string and
    /// merge its entries in. A later call for the same path overwrites
    /// the earlier entry — "union of all tool_results" does not specify
    /// priority, and the loop does not reject repeat calls, so the most
    /// recent fetch wins.
    ///
    /// Malformed JSON is ignored rather than propagated: a tool result
    /// the loop can't parse should not abort the whole request, since
    /// evidence is allowed to be empty.
    pub fn merge_tool_result(&mut self, raw: &str) {
        let Ok(hits) = serde_json::from_str::<Vec<RawHit>>(raw) else {
            tracing::debug!("tool result was not a JSON array of hits; skipping merge");
            return;
        };

        for hit in hits {
            self.articles.insert(
                hit.path.clone(),
                Article {
                    path: hit.path,
                    title: hit.title,
                    content: hit.content,
                    similarity: hit.similarity,
                    metadata: ChunkMetadata::unknown(),
                },
            );
        }
    }

    /// The set of paths currently in evidence, for the citation gate.
    pub fn paths(&self) -> BTreeSet<String> {
        self.articles.keys().cloned().collect()
    }

    /// Every collected article, in path order.
    pub fn articles(&self) -> Vec<&Article> {
        self.articles.values().collect()
    }

    /// Number of distinct articles collected.
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether no articles have been collected.
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Highest similarity seen across every collected article, if any.
    pub fn top_similarity(&self) -> Option<f32> {
        self.articles
            .values()
            .map(|a| a.similarity)
            .fold(None, |acc, s| Some(acc.map_or(s, |m: f32| m.max(s))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_fetch_articles_style_result_defaulting_similarity() {
        let mut sink = EvidenceSink::new();
        sink.merge_tool_result(
            r#"[{"path":"billing/a.md","title":"A","content":"body a"}]"#,
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.top_similarity(), Some(1.0));
    }

    #[test]
    fn merges_search_articles_style_result_with_similarity() {
        let mut sink = EvidenceSink::new();
        sink.merge_tool_result(
            r#"[{"path":"a.md","title":"A","content":"x","similarity":0.71}]"#,
        );
        assert_eq!(sink.top_similarity(), Some(0.71));
    }

    #[test]
    fn later_merge_overwrites_same_path() {
        let mut sink = EvidenceSink::new();
        sink.merge_tool_result(r#"[{"path":"a.md","title":"old","content":"old"}]"#);
        sink.merge_tool_result(r#"[{"path":"a.md","title":"new","content":"new"}]"#);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.articles()[0].content, "new");
    }

    #[test]
    fn malformed_result_is_ignored_not_fatal() {
        let mut sink = EvidenceSink::new();
        sink.merge_tool_result("Escalation draft recorded: \"x\"");
        assert!(sink.is_empty());
    }

    #[test]
    fn paths_reflects_every_distinct_article() {
        let mut sink = EvidenceSink::new();
        sink.merge_tool_result(
            r#"[{"path":"a.md","title":null,"content":"x"},{"path":"b.md","title":null,"content":"y"}]"#,
        );
        assert_eq!(
            sink.paths(),
            ["a.md".to_string(), "b.md".to_string()].into_iter().collect()
        );
    }
}
