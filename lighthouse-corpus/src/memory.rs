//! In-memory [`CorpusStore`] backed by a `RwLock<Vec<ArticleChunk>>`.
//!
//! Grounded in `neuron-state-memory`'s `RwLock<HashMap<..>>` pattern.
//! Suitable for tests and as the default backend for local development;
//! production deployments point at the real vector store instead.

use crate::error::CorpusError;
use crate::store::CorpusStore;
use async_trait::async_trait;
use lighthouse_types::ArticleChunk;
use std::collections::BTreeSet;
use tokio::sync::RwLock;

/// In-memory corpus store computing cosine similarity over all chunks.
///
/// `O(n)` per search — fine for tests and small fixture corpora, not
/// meant to stand in for the production vector store at scale.
pub struct MemoryCorpusStore {
    chunks: RwLock<Vec<ArticleChunk>>,
}

impl MemoryCorpusStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            chunks: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-seeded with the given chunks.
    pub fn with_chunks(chunks: Vec<ArticleChunk>) -> Self {
        Self {
            chunks: RwLock::new(chunks),
        }
    }

    /// Insert or replace a chunk.
    pub async fn upsert(&self, chunk: ArticleChunk) {
        let mut chunks = self.chunks.write().await;
        if let Some(existing) = chunks.iter_mut().find(|c| c.id == chunk.id) {
            *existing = chunk;
        } else {
            chunks.push(chunk);
        }
    }
}

impl Default for MemoryCorpusStore {
    fn default() -> Self {
        Self::new()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[async_trait]
impl CorpusStore for MemoryCorpusStore {
    async fn fetch_by_paths(
        &self,
        paths: &BTreeSet<String>,
    ) -> Result<Vec<ArticleChunk>, CorpusError> {
        let chunks = self.chunks.read().await;
        Ok(chunks
            .iter()
            .filter(|c| paths.contains(&c.path))
            .cloned()
            .collect())
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(ArticleChunk, f32)>, CorpusError> {
        let chunks = self.chunks.read().await;
        let mut scored: Vec<(ArticleChunk, f32)> = chunks
            .iter()
            .map(|c| (c.clone(), cosine_similarity(query, &c.embedding)))
            .collect();
        // Cosine similarity in [-1, 1]; the store's contract promises
        // similarity in [0, 1], so remap.
        for (_, score) in scored.iter_mut() {
            *score = (*score + 1.0) / 2.0;
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        Ok(scored)
    }
}
