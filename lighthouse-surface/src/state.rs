//! Shared application state handed to every axum handler.

use crate::auth::ApiKeyStore;
use crate::escalation::TicketNotifier;
use lighthouse_agent::LoopConfig;
use lighthouse_agent::SynthesisConfig;
use lighthouse_cache::{ConversationCache, FeedbackLog, RateLimiter};
use lighthouse_corpus::CorpusStore;
use lighthouse_manifest::ManifestCache;
use lighthouse_provider::Provider;
use lighthouse_tool::{ToolLimits, ToolRegistry};
use std::sync::Arc;

/// Everything a request handler needs to run the pipeline, shared across
/// the process behind `Arc` the way the teacher's `neuron-mcp::server`
/// shares its `Arc<ServerState>` with every connection handler.
#[derive(Clone)]
pub struct AppState {
    /// The corpus backend.
    pub corpus: Arc<dyn CorpusStore>,
    /// The LM/embedding provider.
    pub provider: Arc<dyn Provider>,
    /// Cached hierarchy manifest.
    pub manifest: Arc<ManifestCache>,
    /// The four registered tools.
    pub tools: Arc<ToolRegistry>,
    /// Thread-keyed cache of full answers, for "more details" expansion.
    pub conversations: Arc<ConversationCache>,
    /// Per-identity rate limiter.
    pub rate_limiter: Arc<RateLimiter>,
    /// Append-only feedback log.
    pub feedback: Arc<FeedbackLog>,
    /// Authentication key store (DB-issued + static config keys).
    pub api_keys: Arc<ApiKeyStore>,
    /// Where escalation tickets are delivered.
    pub notifier: Arc<dyn TicketNotifier>,
    /// Retrieval tunables passed to every `ToolContext`.
    pub tool_limits: ToolLimits,
    /// Turn/sampling limits for the agent loop.
    pub loop_config: LoopConfig,
    /// Sampling parameters for final synthesis.
    pub synthesis_config: SynthesisConfig,
    /// Origins allowed through CORS, for the response's preflight layer.
    pub allowed_origins: Vec<String>,
    /// Pinned `(chat_model, embedding_model, dimensions, chunker)` string
    /// stamped into every answer's provenance.
    pub pipeline_version: String,
}
