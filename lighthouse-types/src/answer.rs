//! Escalation drafts, grounded answers, and feedback records.

use crate::id::{RequestId, ThreadKey};
use serde::{Deserialize, Serialize};

/// Why the requester believes this can't be answered from the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// The product doesn't do this today.
    FeatureRequest,
    /// Something appears broken.
    BugReport,
    /// The question needs a human to disambiguate before it can be
    /// answered.
    ClarificationNeeded,
}

/// A structured support ticket draft produced when the model calls
/// `escalate_to_human`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationDraft {
    /// Short ticket title.
    pub title: String,
    /// Category of the request.
    pub request_type: RequestType,
    /// Problem statement in the requester's own terms.
    pub problem_statement: String,
    /// Article paths consulted that came close but didn't answer the
    /// question, if any.
    #[serde(default)]
    pub suggested_docs: Vec<String>,
}

/// How confident the pipeline is in the grounded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// At least one article was consulted and the gate passed.
    Confirmed,
    /// No evidence was found, or the gate required a safe fallback.
    NeedsClarification,
}

/// How the request was answered, for operability/reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteMode {
    /// Synthesis produced a cited answer and the gate passed.
    Grounded,
    /// The gate rejected the draft; the canned fallback was returned.
    GateFailed,
    /// Retrieval failed before synthesis could run.
    RetrievalFailed,
    /// The model escalated instead of answering.
    Escalated,
    /// A previously cached detailed answer was replayed.
    CachedExpansion,
}

/// Execution provenance attached to every grounded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    /// Request identifier, shared with logs, cache keys, and headers.
    pub request_id: RequestId,
    /// Wall-clock latency of the request in milliseconds.
    pub latency_ms: u64,
    /// How the request was answered.
    pub mode: RouteMode,
    /// Pinned retrieval program version string.
    pub pipeline_version: String,
}

/// The final, user-facing answer object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedAnswer {
    /// Customer-facing summary. Must only contain citations whose `ref`
    /// is in the collected evidence set for this request.
    pub summary: String,
    /// Optional longer-form answer, same citation constraint as `summary`.
    pub detailed_answer: Option<String>,
    /// Confidence level.
    pub confidence: Confidence,
    /// Escalation draft, if the model produced one.
    pub escalation: Option<EscalationDraft>,
    /// Paths of every article in collected evidence for this request,
    /// for the REST surface's optional `evidence` field (`spec.md`
    /// §4.8) and for feedback records (`spec.md` §3 `article_count`).
    pub evidence_paths: Vec<String>,
    /// Execution provenance.
    pub provenance: Provenance,
}

/// A user's verdict on a previously returned answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The answer helped.
    Helpful,
    /// The answer did not help.
    NotHelpful,
}

/// Append-only feedback record, keyed by `request_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// The request this feedback refers to.
    pub request_id: RequestId,
    /// The thread the request belonged to.
    pub thread_key: ThreadKey,
    /// The user who gave the feedback.
    pub user_id: String,
    /// Their verdict.
    pub verdict: Verdict,
    /// The question text at the time of the request, for audit.
    pub question_snapshot: String,
    /// How the request was routed.
    pub route_mode: RouteMode,
    /// Number of distinct articles in the collected evidence.
    pub article_count: usize,
    /// Best similarity score observed, if any search was performed.
    pub top_similarity: Option<f32>,
}
