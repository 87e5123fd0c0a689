//! End-to-end scenarios from `spec.md` §8, run against `run_pipeline`
//! directly with a `MemoryCorpusStore` and a scripted `MockProvider`.
//!
//! Bypasses the axum HTTP layer entirely: these exercise the agent loop,
//! synthesis, and citation gate together, which is what the scenarios
//! actually describe. Routing/auth/CORS concerns are covered by the
//! unit tests inside `rest.rs`/`auth.rs`.

use lighthouse_agent::{LoopConfig, SynthesisConfig};
use lighthouse_cache::{ConversationCache, FeedbackLog, RateLimitConfig, RateLimiter};
use lighthouse_corpus::MemoryCorpusStore;
use lighthouse_provider::{ChatResponse, ContentPart, MockProvider, ScriptedChat, StopReason, TokenUsage};
use lighthouse_surface::escalation::NoopNotifier;
use lighthouse_surface::validation::AskOptions;
use lighthouse_surface::{ApiKeyStore, AppState, PipelineRequest};
use lighthouse_tool::ToolLimits;
use lighthouse_types::{ArticleChunk, ChunkMetadata, Confidence, RouteMode, ThreadKey};
use std::sync::Arc;
use std::time::Duration;

fn tool_use(id: &str, name: &str, input: serde_json::Value) -> ChatResponse {
    ChatResponse {
        content: vec![ContentPart::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }],
        stop_reason: StopReason::ToolUse,
        usage: TokenUsage::default(),
        model: "mock".to_string(),
    }
}

fn end_turn(text: &str) -> ChatResponse {
    ChatResponse {
        content: vec![ContentPart::Text { text: text.to_string() }],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
        model: "mock".to_string(),
    }
}

fn build_state(provider: MockProvider, corpus: MemoryCorpusStore, max_requests: u32) -> AppState {
    let provider = Arc::new(provider);
    AppState {
        corpus: Arc::new(corpus),
        provider,
        manifest: Arc::new(lighthouse_manifest::ManifestCache::new(
            Box::new(lighthouse_manifest::StaticManifestSource("hierarchy".to_string())),
            Duration::from_secs(60),
        )),
        tools: Arc::new(lighthouse_tool::default_registry()),
        conversations: Arc::new(ConversationCache::new(Duration::from_secs(3600))),
        rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests,
        })),
        feedback: Arc::new(FeedbackLog::new()),
        api_keys: Arc::new(ApiKeyStore::empty()),
        notifier: Arc::new(NoopNotifier),
        tool_limits: ToolLimits::default(),
        loop_config: LoopConfig::default(),
        synthesis_config: SynthesisConfig::default(),
        allowed_origins: vec!["*".to_string()],
        pipeline_version: "chat-v1/embed-v1/1536/chunker-v1".to_string(),
    }
}

fn request(question: &str) -> PipelineRequest {
    PipelineRequest {
        question: question.to_string(),
        conversation_history: vec![],
        options: AskOptions::default(),
        thread_key: ThreadKey::new("scenario-thread"),
    }
}

fn chunk(path: &str, body: &str) -> ArticleChunk {
    ArticleChunk {
        id: path.to_string(),
        path: path.to_string(),
        section: None,
        title: Some(path.to_string()),
        body: body.to_string(),
        embedding: vec![],
        metadata: ChunkMetadata::unknown(),
    }
}

#[tokio::test]
async fn scenario_a_happy_path() {
    let provider = MockProvider::new()
        .with_chat(ScriptedChat::Respond(tool_use("t1", "knowledge_base", serde_json::json!({}))))
        .with_chat(ScriptedChat::Respond(tool_use(
            "t2",
            "fetch_articles",
            serde_json::json!({"paths": ["billing/multi-currency.md"]}),
        )))
        .with_chat(ScriptedChat::Respond(end_turn("ok")))
        .with_synthesis("Yes, invoices can be issued in multiple currencies [[1]](billing/multi-currency.md).");

    let corpus = MemoryCorpusStore::with_chunks(vec![chunk(
        "billing/multi-currency.md",
        "Enable multi-currency invoicing under Settings > Billing.",
    )]);

    let state = build_state(provider, corpus, 60);
    let answer = lighthouse_surface::run_pipeline(
        &state,
        lighthouse_types::RequestId::new("scenario-a"),
        request("Does Light support multi-currency invoices?"),
    )
    .await;

    assert_eq!(answer.confidence, Confidence::Confirmed);
    assert!(matches!(answer.provenance.mode, RouteMode::Grounded));
    assert!(answer.summary.contains("[[1]](billing/multi-currency.md)"));
}

#[tokio::test]
async fn scenario_b_search_fallback() {
    let provider = MockProvider::new()
        .with_chat(ScriptedChat::Respond(tool_use("t1", "knowledge_base", serde_json::json!({}))))
        .with_chat(ScriptedChat::Respond(tool_use(
            "t2",
            "search_articles",
            serde_json::json!({"query": "import contacts from Salesforce"}),
        )))
        .with_chat(ScriptedChat::Respond(end_turn("ok")))
        .with_synthesis("Import contacts via the Salesforce connector [[1]](integrations/salesforce-contacts.md).");

    let corpus = MemoryCorpusStore::with_chunks(vec![chunk(
        "integrations/salesforce-contacts.md",
        "Use the Salesforce connector to sync your contact list.",
    )]);

    let state = build_state(provider, corpus, 60);
    let answer = lighthouse_surface::run_pipeline(
        &state,
        lighthouse_types::RequestId::new("scenario-b"),
        request("How do I import contacts from Salesforce?"),
    )
    .await;

    assert_eq!(answer.confidence, Confidence::Confirmed);
    assert!(answer.summary.contains("integrations/salesforce-contacts.md"));
}

#[tokio::test]
async fn scenario_c_no_evidence_gate_fails_on_functional_claim() {
    let provider = MockProvider::new()
        .with_chat(ScriptedChat::Respond(tool_use("t1", "knowledge_base", serde_json::json!({}))))
        .with_chat(ScriptedChat::Respond(end_turn("nothing relevant")))
        .with_synthesis("This automatically handles that for you.");

    let state = build_state(provider, MemoryCorpusStore::new(), 60);
    let answer = lighthouse_surface::run_pipeline(
        &state,
        lighthouse_types::RequestId::new("scenario-c"),
        request("Does it support quantum widget synchronization?"),
    )
    .await;

    assert_eq!(answer.confidence, Confidence::NeedsClarification);
    assert!(matches!(answer.provenance.mode, RouteMode::GateFailed));
    assert!(answer.escalation.is_none());
}

#[tokio::test]
async fn scenario_d_escalation() {
    let provider = MockProvider::new()
        .with_chat(ScriptedChat::Respond(tool_use("t1", "knowledge_base", serde_json::json!({}))))
        .with_chat(ScriptedChat::Respond(end_turn("nothing matches")))
        .with_chat(ScriptedChat::Respond(tool_use(
            "t2",
            "escalate_to_human",
            serde_json::json!({
                "title": "Request: bulk invoice export",
                "request_type": "feature_request",
                "problem_statement": "Customer wants to export all invoices in one CSV.",
            }),
        )))
        .with_chat(ScriptedChat::Respond(end_turn("a ticket was filed")));

    let state = build_state(provider, MemoryCorpusStore::new(), 60);
    let answer = lighthouse_surface::run_pipeline(
        &state,
        lighthouse_types::RequestId::new("scenario-d"),
        request("I need to bulk export all invoices, can you add that?"),
    )
    .await;

    assert_eq!(answer.confidence, Confidence::NeedsClarification);
    assert!(matches!(answer.provenance.mode, RouteMode::Escalated));
    let escalation = answer.escalation.expect("escalation draft expected");
    assert_eq!(escalation.title, "Request: bulk invoice export");
}

#[tokio::test]
async fn scenario_e_invalid_citation() {
    let provider = MockProvider::new()
        .with_chat(ScriptedChat::Respond(tool_use("t1", "knowledge_base", serde_json::json!({}))))
        .with_chat(ScriptedChat::Respond(tool_use(
            "t2",
            "fetch_articles",
            serde_json::json!({"paths": ["billing/multi-currency.md"]}),
        )))
        .with_chat(ScriptedChat::Respond(end_turn("ok")))
        .with_synthesis("See this other note [[2]](billing/ghost.md) for details.");

    let corpus = MemoryCorpusStore::with_chunks(vec![chunk(
        "billing/multi-currency.md",
        "Multi-currency content.",
    )]);

    let state = build_state(provider, corpus, 60);
    let answer = lighthouse_surface::run_pipeline(
        &state,
        lighthouse_types::RequestId::new("scenario-e"),
        request("Does Light support multi-currency invoices?"),
    )
    .await;

    assert_eq!(answer.confidence, Confidence::NeedsClarification);
    assert!(matches!(answer.provenance.mode, RouteMode::GateFailed));
    assert!(answer.summary.contains("scenario-e"));
}

#[tokio::test]
async fn scenario_f_rate_limit() {
    let state = build_state(MockProvider::new(), MemoryCorpusStore::new(), 2);

    let first = state.rate_limiter.check("key1").await;
    let second = state.rate_limiter.check("key1").await;
    let third = state.rate_limiter.check("key1").await;

    assert!(matches!(first, lighthouse_cache::RateLimitOutcome::Allowed(_)));
    assert!(matches!(second, lighthouse_cache::RateLimitOutcome::Allowed(_)));
    match third {
        lighthouse_cache::RateLimitOutcome::Exceeded { retry_after_secs, .. } => {
            assert!(retry_after_secs <= 60);
        }
        other => panic!("expected Exceeded on the third request, got {other:?}"),
    }
}
