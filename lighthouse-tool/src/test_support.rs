//! Test-only fixtures shared across this crate's unit tests.

use crate::context::{ToolContext, ToolLimits};
use lighthouse_corpus::MemoryCorpusStore;
use lighthouse_manifest::{ManifestCache, StaticManifestSource};
use lighthouse_provider::MockProvider;
use std::sync::Arc;
use std::time::Duration;

/// A [`ToolContext`] wired to an empty in-memory store, a scriptless mock
/// provider, and a static `"fixture hierarchy"` manifest.
pub fn fixture_ctx() -> ToolContext {
    let corpus = Arc::new(MemoryCorpusStore::new());
    let provider = Arc::new(MockProvider::new());
    let manifest = Arc::new(ManifestCache::new(
        Box::new(StaticManifestSource("fixture hierarchy".to_string())),
        Duration::from_secs(60),
    ));
    ToolContext::new(corpus, provider, manifest, ToolLimits::default())
}

/// A context backed by the given chunks, otherwise identical to
/// [`fixture_ctx`].
pub fn fixture_ctx_with_chunks(chunks: Vec<lighthouse_types::ArticleChunk>) -> ToolContext {
    let corpus = Arc::new(MemoryCorpusStore::with_chunks(chunks));
    let provider = Arc::new(MockProvider::new());
    let manifest = Arc::new(ManifestCache::new(
        Box::new(StaticManifestSource("fixture hierarchy".to_string())),
        Duration::from_secs(60),
    ));
    ToolContext::new(corpus, provider, manifest, ToolLimits::default())
}
