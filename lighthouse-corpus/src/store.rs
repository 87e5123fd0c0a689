//! The [`CorpusStore`] trait — the core's only view of the external
//! corpus (`spec.md` §4.1).
//!
//! The core treats retrieved chunks as opaque rows: it does not re-rank
//! similarity results, and it tolerates empty results, transport errors,
//! and chunks missing optional metadata (filled with
//! [`lighthouse_types::ChunkMetadata::unknown`]).

use crate::error::CorpusError;
use async_trait::async_trait;
use lighthouse_types::ArticleChunk;
use std::collections::BTreeSet;

/// Contract the core requires from the corpus store.
///
/// Two operations: an exact path lookup (`fetch_by_paths`, used by
/// `fetch_articles`) and a dense-vector nearest-neighbor search
/// (`similarity_search`, used by `search_articles`). The store owns
/// ranking; the core never re-ranks or re-scores what comes back.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Return every chunk whose `path` is in `paths`, preserving a stable
    /// per-path order sufficient to deterministically reconstruct article
    /// content when grouped with [`crate::group_into_articles`].
    async fn fetch_by_paths(
        &self,
        paths: &BTreeSet<String>,
    ) -> Result<Vec<ArticleChunk>, CorpusError>;

    /// Return the `k` chunks most similar to `query`, sorted by
    /// descending similarity in `[0, 1]`. An empty result is valid.
    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(ArticleChunk, f32)>, CorpusError>;
}
