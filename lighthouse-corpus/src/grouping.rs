//! Grouping chunks into articles.
//!
//! `path` is the grouping key: an article equals the ordered
//! concatenation of all chunks sharing that path (`spec.md` §3). This is
//! the "path grouping" testable property (`spec.md` §8.3).

use lighthouse_types::{Article, ArticleChunk};
use std::collections::BTreeMap;

/// Group chunks by `path` into logical articles.
///
/// `similarity` on the resulting [`Article`] is `1.0` for every entry —
/// callers that have a per-chunk similarity score (search results) should
/// set it themselves after grouping. Chunks for a given path keep the
/// relative order they arrived in.
pub fn group_into_articles(chunks: Vec<ArticleChunk>) -> Vec<Article> {
    let mut by_path: BTreeMap<String, Vec<ArticleChunk>> = BTreeMap::new();
    for chunk in chunks {
        by_path.entry(chunk.path.clone()).or_default().push(chunk);
    }

    by_path
        .into_values()
        .filter_map(|group| {
            let first = group.first()?;
            let title = first.title.clone();
            let metadata = first.metadata.clone();
            let path = first.path.clone();
            let content = group
                .iter()
                .map(|c| c.body.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            Some(Article {
                path,
                title,
                content,
                similarity: 1.0,
                metadata,
            })
        })
        .collect()
}

/// Group search results (chunk, similarity) into articles, keeping the
/// best similarity seen for each path.
pub fn group_search_results(results: Vec<(ArticleChunk, f32)>) -> Vec<Article> {
    let mut best: BTreeMap<String, (ArticleChunk, f32)> = BTreeMap::new();
    for (chunk, score) in results {
        best.entry(chunk.path.clone())
            .and_modify(|(existing_chunk, existing_score)| {
                if score > *existing_score {
                    *existing_chunk = chunk.clone();
                    *existing_score = score;
                }
            })
            .or_insert((chunk, score));
    }

    best.into_values()
        .map(|(chunk, score)| Article {
            path: chunk.path,
            title: chunk.title,
            content: chunk.body,
            similarity: score,
            metadata: chunk.metadata,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighthouse_types::ChunkMetadata;

    fn chunk(path: &str, body: &str) -> ArticleChunk {
        ArticleChunk {
            id: format!("{path}#{body}"),
            path: path.to_string(),
            section: None,
            title: Some("Title".to_string()),
            body: body.to_string(),
            embedding: vec![],
            metadata: ChunkMetadata::unknown(),
        }
    }

    #[test]
    fn groups_by_path_preserving_order() {
        let chunks = vec![
            chunk("billing/multi-currency.md", "intro"),
            chunk("other/page.md", "solo"),
            chunk("billing/multi-currency.md", "details"),
        ];

        let articles = group_into_articles(chunks);
        assert_eq!(articles.len(), 2);

        let billing = articles
            .iter()
            .find(|a| a.path == "billing/multi-currency.md")
            .unwrap();
        assert_eq!(billing.content, "intro\n\ndetails");
        assert_eq!(billing.similarity, 1.0);
    }

    #[test]
    fn search_results_keep_best_similarity_per_path() {
        let results = vec![
            (chunk("a.md", "x"), 0.4),
            (chunk("a.md", "y"), 0.9),
            (chunk("b.md", "z"), 0.7),
        ];

        let articles = group_search_results(results);
        let a = articles.iter().find(|a| a.path == "a.md").unwrap();
        assert_eq!(a.similarity, 0.9);
        assert_eq!(a.content, "y");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_into_articles(vec![]).is_empty());
        assert!(group_search_results(vec![]).is_empty());
    }
}
