//! The per-request orchestration: surface → agent loop → synthesis →
//! citation gate → surface (`spec.md` §2, §4.4–§4.6, §7).
//!
//! [`run_pipeline`] is deliberately infallible. `spec.md` §6 enumerates
//! exactly five REST status codes (`200, 400, 401, 429, 500`) and §7
//! states that a retrieval failure, a synthesis failure, or a gate
//! failure each "yields" a grounded answer carrying a canned fallback —
//! never an HTTP error. Validation, auth, and rate-limit failures are
//! handled before this function runs; anything this function can't
//! recover from still produces a [`GroundedAnswer`], just one with
//! `confidence = needs_clarification`.

use crate::escalation::EscalationTicket;
use crate::state::AppState;
use crate::validation::{AskOptions, ConversationTurn, TurnRole};
use lighthouse_agent::{run_agent_loop, run_synthesis, LoopConfig, SynthesisConfig, AGENT_SYSTEM_PROMPT};
use lighthouse_gate::{run_gate, GateResult};
use lighthouse_provider::{ContentPart, ProviderMessage, Role};
use lighthouse_tool::ToolContext;
use lighthouse_types::{Confidence, EscalationDraft, GroundedAnswer, Provenance, RequestId, RouteMode, ThreadKey};
use std::time::Instant;

/// Summary/detail split point. Beyond this many characters, the full
/// text moves to `detailed_answer` and `summary` becomes a truncated
/// lead-in, so a chat renderer can show a short reply with a "more
/// details" affordance (`spec.md` §4.7).
const SUMMARY_TRUNCATE_CHARS: usize = 400;

/// Everything needed to run one request through the pipeline.
pub struct PipelineRequest {
    /// The user's question.
    pub question: String,
    /// Prior turns, already validated (≤ 10, ≤ 2000 chars each).
    pub conversation_history: Vec<ConversationTurn>,
    /// Response-shaping knobs.
    pub options: AskOptions,
    /// The conversation thread this request belongs to.
    pub thread_key: ThreadKey,
}

/// Run one request through the full pipeline. Always succeeds in the
/// sense of producing a response; failures are encoded in the returned
/// answer's `confidence`/`mode`, never raised as an error.
pub async fn run_pipeline(state: &AppState, request_id: RequestId, request: PipelineRequest) -> GroundedAnswer {
    let started_at = Instant::now();

    let thread_context = to_provider_messages(&request.conversation_history);
    let tool_ctx = ToolContext::new(
        state.corpus.clone(),
        state.provider.clone(),
        state.manifest.clone(),
        state.tool_limits,
    );

    let loop_outcome = run_agent_loop(
        state.provider.as_ref(),
        state.tools.as_ref(),
        &tool_ctx,
        AGENT_SYSTEM_PROMPT,
        &thread_context,
        &request.question,
        state.loop_config,
    )
    .await;

    let evidence = match loop_outcome {
        Ok(outcome) => outcome.evidence,
        Err(error) => {
            tracing::warn!(request_id = %request_id, error = %error, "agent loop failed, returning canned fallback");
            return finish(
                state,
                request_id,
                request.thread_key,
                started_at,
                &request.question,
                canned_fallback(&request_id),
                Confidence::NeedsClarification,
                RouteMode::RetrievalFailed,
                None,
                &EvidenceMeta::empty(),
                request.options,
            )
            .await;
        }
    };

    let evidence_meta = EvidenceMeta::from_sink(&evidence);

    if evidence.is_empty() {
        if let Some(draft) = evidence.escalation.clone() {
            let summary = escalation_summary(&draft);
            notify_escalation(state, &request_id, draft.clone()).await;
            return finish(
                state,
                request_id,
                request.thread_key,
                started_at,
                &request.question,
                summary,
                Confidence::NeedsClarification,
                RouteMode::Escalated,
                Some(draft),
                &evidence_meta,
                request.options,
            )
            .await;
        }
    }

    let synthesis = run_synthesis(state.provider.as_ref(), &request.question, &evidence, state.synthesis_config).await;

    let text = match synthesis {
        Ok(result) => result.text,
        Err(error) => {
            tracing::warn!(request_id = %request_id, error = %error, "synthesis failed, returning canned fallback");
            return finish(
                state,
                request_id,
                request.thread_key,
                started_at,
                &request.question,
                canned_fallback(&request_id),
                Confidence::NeedsClarification,
                RouteMode::RetrievalFailed,
                evidence.escalation,
                &evidence_meta,
                request.options,
            )
            .await;
        }
    };

    let evidence_paths = evidence.paths();
    match run_gate(&text, &evidence_paths) {
        GateResult::Pass { confirmed } => {
            let confidence = if confirmed {
                Confidence::Confirmed
            } else {
                Confidence::NeedsClarification
            };
            if let Some(draft) = &evidence.escalation {
                notify_escalation(state, &request_id, draft.clone()).await;
            }
            finish(
                state,
                request_id,
                request.thread_key,
                started_at,
                &request.question,
                text,
                confidence,
                RouteMode::Grounded,
                evidence.escalation,
                &evidence_meta,
                request.options,
            )
            .await
        }
        GateResult::Fail(failure) => {
            tracing::info!(
                request_id = %request_id,
                reason = failure.reason(),
                "citation gate rejected synthesized answer"
            );
            if let Some(draft) = &evidence.escalation {
                notify_escalation(state, &request_id, draft.clone()).await;
            }
            finish(
                state,
                request_id,
                request.thread_key,
                started_at,
                &request.question,
                canned_fallback(&request_id),
                Confidence::NeedsClarification,
                RouteMode::GateFailed,
                evidence.escalation,
                &evidence_meta,
                request.options,
            )
            .await
        }
    }
}

/// Paths, count, and best similarity of collected evidence, carried
/// alongside the synthesized text so `finish` can populate both the
/// response's `evidence_paths` and the conversation-cache entry a later
/// feedback submission reads back (`spec.md` §3, §4.10).
struct EvidenceMeta {
    paths: Vec<String>,
    article_count: usize,
    top_similarity: Option<f32>,
}

impl EvidenceMeta {
    fn empty() -> Self {
        Self {
            paths: Vec::new(),
            article_count: 0,
            top_similarity: None,
        }
    }

    fn from_sink(evidence: &lighthouse_agent::EvidenceSink) -> Self {
        Self {
            paths: evidence.paths().into_iter().collect(),
            article_count: evidence.len(),
            top_similarity: evidence.top_similarity(),
        }
    }
}

/// Split `text` into `summary`/`detailed_answer`, cache the full text
/// (plus feedback provenance) for later expansion, and assemble the
/// final [`GroundedAnswer`].
#[allow(clippy::too_many_arguments)]
async fn finish(
    state: &AppState,
    request_id: RequestId,
    thread_key: ThreadKey,
    started_at: Instant,
    question: &str,
    text: String,
    confidence: Confidence,
    mode: RouteMode,
    escalation: Option<EscalationDraft>,
    evidence: &EvidenceMeta,
    options: AskOptions,
) -> GroundedAnswer {
    let (summary, detailed_answer) = split_summary(&text, options.include_technical_details);

    state
        .conversations
        .insert(
            request_id.clone(),
            text,
            thread_key,
            question.to_string(),
            mode,
            evidence.article_count,
            evidence.top_similarity,
        )
        .await;

    GroundedAnswer {
        summary,
        detailed_answer,
        confidence,
        escalation,
        evidence_paths: evidence.paths.clone(),
        provenance: Provenance {
            request_id,
            latency_ms: started_at.elapsed().as_millis() as u64,
            mode,
            pipeline_version: state.pipeline_version.clone(),
        },
    }
}

fn split_summary(text: &str, force_detail: bool) -> (String, Option<String>) {
    let char_count = text.chars().count();
    if char_count > SUMMARY_TRUNCATE_CHARS {
        let truncated: String = text.chars().take(SUMMARY_TRUNCATE_CHARS).collect();
        (format!("{truncated}..."), Some(text.to_string()))
    } else if force_detail {
        (text.to_string(), Some(text.to_string()))
    } else {
        (text.to_string(), None)
    }
}

fn canned_fallback(request_id: &RequestId) -> String {
    format!("I don't have a help article covering this topic. (reference: {request_id})")
}

fn escalation_summary(draft: &EscalationDraft) -> String {
    format!(
        "I've created a support ticket for this: \"{}\". Our team will follow up on: {}",
        draft.title, draft.problem_statement
    )
}

async fn notify_escalation(state: &AppState, request_id: &RequestId, draft: EscalationDraft) {
    let ticket = EscalationTicket {
        request_id: request_id.to_string(),
        draft,
    };
    if let Err(error) = state.notifier.notify(ticket).await {
        tracing::warn!(request_id = %request_id, error = %error, "failed to deliver escalation ticket");
    }
}

fn to_provider_messages(history: &[ConversationTurn]) -> Vec<ProviderMessage> {
    history
        .iter()
        .map(|turn| ProviderMessage {
            role: match turn.role {
                TurnRole::User => Role::User,
                TurnRole::Assistant => Role::Assistant,
            },
            content: vec![ContentPart::Text {
                text: turn.content.clone(),
            }],
        })
        .collect()
}
