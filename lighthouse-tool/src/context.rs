//! Shared, per-request dependencies handed to every tool call.

use lighthouse_corpus::CorpusStore;
use lighthouse_manifest::ManifestCache;
use lighthouse_provider::Provider;
use lighthouse_types::EscalationDraft;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tunable retrieval parameters, threaded in from config rather than
/// hardcoded so deployments can adjust them without a rebuild.
#[derive(Debug, Clone, Copy)]
pub struct ToolLimits {
    /// Maximum `paths` accepted by `fetch_articles` in one call.
    pub max_fetch_paths: usize,
    /// Minimum similarity a chunk must clear to survive `search_articles`
    /// filtering (`σ_min`).
    pub min_similarity: f32,
}

impl Default for ToolLimits {
    fn default() -> Self {
        Self {
            max_fetch_paths: 15,
            min_similarity: 0.15,
        }
    }
}

/// Dependencies and per-request mutable slots shared by every tool.
///
/// One `ToolContext` is built per inbound request and handed by reference
/// to each tool call the agent loop dispatches. `escalation` is the only
/// piece of state a tool writes directly — `fetch_articles` and
/// `search_articles` return their findings as a string result and leave
/// evidence collection to the loop driver (`spec.md` §4.4).
pub struct ToolContext {
    /// The corpus backend.
    pub corpus: Arc<dyn CorpusStore>,
    /// The LM/embedding provider, used by `search_articles` to embed the
    /// query.
    pub provider: Arc<dyn Provider>,
    /// The cached manifest hierarchy, used by `knowledge_base`.
    pub manifest: Arc<ManifestCache>,
    /// Retrieval tunables.
    pub limits: ToolLimits,
    /// Slot `escalate_to_human` writes into. `None` until (and unless)
    /// the model calls that tool during this request.
    pub escalation: Arc<Mutex<Option<EscalationDraft>>>,
}

impl ToolContext {
    /// Build a context for a single request.
    pub fn new(
        corpus: Arc<dyn CorpusStore>,
        provider: Arc<dyn Provider>,
        manifest: Arc<ManifestCache>,
        limits: ToolLimits,
    ) -> Self {
        Self {
            corpus,
            provider,
            manifest,
            limits,
            escalation: Arc::new(Mutex::new(None)),
        }
    }
}
