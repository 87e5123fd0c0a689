//! The agent loop state machine (`spec.md` §4.4).
//!
//! Modeled as a plain `async fn` driving an explicit [`LoopOutcome`]
//! rather than a recursive callback — directly grounded in the teacher's
//! own design note in its source history ("multi-turn tool use → explicit
//! state machine") and in `layer0::Turn`'s "one atomic method, arbitrary
//! internal turns" contract. There is no separate `enum LoopState` type:
//! the states (S0/S1/S2/S3/S_fail) are represented by control flow within
//! one function body, since every transition is taken at most once per
//! turn and nothing outside this function needs to observe the
//! in-between states.

use crate::error::AgentError;
use crate::evidence::EvidenceSink;
use lighthouse_provider::{ChatRequest, ContentPart, Provider, ProviderMessage, Role};
use lighthouse_tool::{ToolContext, ToolRegistry};

/// Turn and sampling limits for one agent loop run.
#[derive(Debug, Clone, Copy)]
pub struct LoopConfig {
    /// `max_turns` — the loop counter ceiling (`spec.md` §4.4 default 8).
    pub max_turns: u32,
    /// Sampling temperature for tool-use turns.
    pub temperature: f64,
    /// Maximum output tokens per turn.
    pub max_tokens: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_turns: 8,
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCondition {
    /// S3: the LM responded with no tool calls.
    NoToolResponse,
    /// S_fail: the turn counter exceeded `max_turns`.
    MaxTurnsExceeded,
}

/// Result of driving the loop to completion.
#[derive(Debug)]
pub struct LoopOutcome {
    /// Why the loop stopped.
    pub stop_condition: StopCondition,
    /// The final transcript, for audit/debugging.
    pub transcript: Vec<ProviderMessage>,
    /// Evidence collected across every tool call.
    pub evidence: EvidenceSink,
    /// Number of S1 (ask-LM) turns taken.
    pub turns_taken: u32,
}

/// Drive the agent loop to completion.
///
/// `thread_context` is prior conversation turns (≤ 10, already trimmed by
/// the caller) inserted into the transcript before the user's question,
/// per the chat-event interface (`spec.md` §4.8).
pub async fn run_agent_loop(
    provider: &dyn Provider,
    tools: &ToolRegistry,
    tool_ctx: &ToolContext,
    system_prompt: &str,
    thread_context: &[ProviderMessage],
    question: &str,
    config: LoopConfig,
) -> Result<LoopOutcome, AgentError> {
    // S0: start.
    let mut transcript: Vec<ProviderMessage> = Vec::with_capacity(thread_context.len() + 1);
    transcript.extend_from_slice(thread_context);
    transcript.push(ProviderMessage::user(question));

    let mut evidence = EvidenceSink::new();
    let mut turns: u32 = 0;
    let schemas = tools.schemas();

    loop {
        // S1: ask the LM.
        turns += 1;
        if turns > config.max_turns {
            return Ok(LoopOutcome {
                stop_condition: StopCondition::MaxTurnsExceeded,
                transcript,
                evidence,
                turns_taken: turns - 1,
            });
        }

        let request = ChatRequest {
            messages: transcript.clone(),
            tools: schemas.clone(),
            system: system_prompt.to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = provider.chat(request).await?;
        let tool_uses = response.tool_uses();

        if tool_uses.is_empty() {
            // S3: no-tool response.
            return Ok(LoopOutcome {
                stop_condition: StopCondition::NoToolResponse,
                transcript,
                evidence,
                turns_taken: turns,
            });
        }

        // S2: dispatch every tool call the model emitted, in order. If
        // there are tool calls, the turn's text is ignored (the spec's
        // resolution of an ambiguity in the source's two synthesis
        // variants, `spec.md` §9).
        let assistant_message = ProviderMessage {
            role: Role::Assistant,
            content: response.content.clone(),
        };
        transcript.push(assistant_message);

        let mut result_parts = Vec::with_capacity(tool_uses.len());
        for (tool_use_id, name, input) in tool_uses {
            let outcome = lighthouse_tool::dispatch_with_tracing(
                tools,
                name,
                input.clone(),
                tool_ctx,
            )
            .await;

            let (content, is_error) = match outcome {
                Ok(output) => {
                    if name == "fetch_articles" || name == "search_articles" {
                        evidence.merge_tool_result(&output);
                    }
                    (output, false)
                }
                Err(err) => (err.to_string(), true),
            };

            result_parts.push(ContentPart::ToolResult {
                tool_use_id: tool_use_id.to_string(),
                content,
                is_error,
            });
        }

        // escalate_to_human writes to tool_ctx.escalation as a side
        // effect rather than through its string return value; pick it up
        // after every tool in this turn has run.
        if let Some(draft) = tool_ctx.escalation.lock().await.take() {
            evidence.escalation = Some(draft);
        }

        transcript.push(ProviderMessage {
            role: Role::User,
            content: result_parts,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lighthouse_corpus::MemoryCorpusStore;
    use lighthouse_manifest::{ManifestCache, StaticManifestSource};
    use lighthouse_provider::{MockProvider, ScriptedChat, StopReason, TokenUsage};
    use lighthouse_tool::ToolLimits;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn tool_ctx(provider: Arc<dyn Provider>) -> ToolContext {
        let corpus = Arc::new(MemoryCorpusStore::new());
        let manifest = Arc::new(ManifestCache::new(
            Box::new(StaticManifestSource("hierarchy".to_string())),
            Duration::from_secs(60),
        ));
        ToolContext::new(corpus, provider, manifest, ToolLimits::default())
    }

    fn tool_use_response(id: &str, name: &str, input: serde_json::Value) -> lighthouse_provider::ChatResponse {
        lighthouse_provider::ChatResponse {
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

    fn text_response(text: &str) -> lighthouse_provider::ChatResponse {
        lighthouse_provider::ChatResponse {
            content: vec![ContentPart::Text { text: text.to_string() }],
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
            model: "mock".to_string(),
        }
    }

    #[tokio::test]
    async fn stops_at_s3_on_first_text_only_response() {
        let mock = Arc::new(
            MockProvider::new().with_chat(ScriptedChat::Respond(text_response("an answer"))),
        );
        let tools = lighthouse_tool::default_registry();
        let ctx = tool_ctx(mock.clone());

        let outcome = run_agent_loop(
            mock.as_ref(),
            &tools,
            &ctx,
            "system",
            &[],
            "does it support X?",
            LoopConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.stop_condition, StopCondition::NoToolResponse);
        assert_eq!(outcome.turns_taken, 1);
        assert!(outcome.evidence.is_empty());
    }

    #[tokio::test]
    async fn dispatches_tool_call_and_merges_evidence_then_stops() {
        let mock = Arc::new(
            MockProvider::new()
                .with_chat(ScriptedChat::Respond(tool_use_response(
                    "tu_1",
                    "knowledge_base",
                    json!({}),
                )))
                .with_chat(ScriptedChat::Respond(tool_use_response(
                    "tu_2",
                    "fetch_articles",
                    json!({"paths": ["billing/a.md"]}),
                )))
                .with_chat(ScriptedChat::Respond(text_response(
                    "cited answer [[1]](billing/a.md)",
                ))),
        );
        let tools = lighthouse_tool::default_registry();
        let corpus = Arc::new(MemoryCorpusStore::with_chunks(vec![lighthouse_types::ArticleChunk {
            id: "1".into(),
            path: "billing/a.md".into(),
            section: None,
            title: Some("A".into()),
            body: "body".into(),
            embedding: vec![],
            metadata: lighthouse_types::ChunkMetadata::unknown(),
        }]));
        let manifest = Arc::new(ManifestCache::new(
            Box::new(StaticManifestSource("hierarchy".to_string())),
            Duration::from_secs(60),
        ));
        let ctx = ToolContext::new(corpus, mock.clone(), manifest, ToolLimits::default());

        let outcome = run_agent_loop(
            mock.as_ref(),
            &tools,
            &ctx,
            "system",
            &[],
            "does billing support X?",
            LoopConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.stop_condition, StopCondition::NoToolResponse);
        assert_eq!(outcome.turns_taken, 3);
        assert_eq!(outcome.evidence.len(), 1);
        assert!(outcome.evidence.paths().contains("billing/a.md"));
    }

    #[tokio::test]
    async fn stops_at_max_turns_when_model_never_stops_calling_tools() {
        let mut mock_builder = MockProvider::new();
        for i in 0..10 {
            mock_builder = mock_builder.with_chat(ScriptedChat::Respond(tool_use_response(
                &format!("tu_{i}"),
                "knowledge_base",
                json!({}),
            )));
        }
        let mock = Arc::new(mock_builder);
        let tools = lighthouse_tool::default_registry();
        let ctx = tool_ctx(mock.clone());

        let config = LoopConfig {
            max_turns: 3,
            ..LoopConfig::default()
        };

        let outcome = run_agent_loop(
            mock.as_ref(),
            &tools,
            &ctx,
            "system",
            &[],
            "question",
            config,
        )
        .await
        .unwrap();

        assert_eq!(outcome.stop_condition, StopCondition::MaxTurnsExceeded);
        assert_eq!(outcome.turns_taken, 3);
    }

    #[tokio::test]
    async fn escalation_draft_is_picked_up_into_evidence() {
        let mock = Arc::new(
            MockProvider::new()
                .with_chat(ScriptedChat::Respond(tool_use_response(
                    "tu_1",
                    "escalate_to_human",
                    json!({
                        "title": "Need bulk import",
                        "request_type": "feature_request",
                        "problem_statement": "No bulk import today.",
                    }),
                )))
                .with_chat(ScriptedChat::Respond(text_response(
                    "A ticket was created for this request.",
                ))),
        );
        let tools = lighthouse_tool::default_registry();
        let ctx = tool_ctx(mock.clone());

        let outcome = run_agent_loop(
            mock.as_ref(),
            &tools,
            &ctx,
            "system",
            &[],
            "can you bulk import?",
            LoopConfig::default(),
        )
        .await
        .unwrap();

        assert!(outcome.evidence.escalation.is_some());
        assert_eq!(
            outcome.evidence.escalation.unwrap().title,
            "Need bulk import"
        );
    }
}
