//! Feedback submission: turns a renderer-emitted verdict into a
//! [`lighthouse_types::FeedbackRecord`] appended to `AppState::feedback`
//! (`spec.md` §3, §4.10).
//!
//! The renderer only ever has a `request_id` and a `user_id` to work
//! with — the rest of the record (question snapshot, route mode, article
//! count, top similarity) is recovered from the conversation cache entry
//! `pipeline::finish` wrote for that request, so the feedback affordance
//! doesn't need to carry the whole answer back to the surface.

use crate::state::AppState;
use lighthouse_types::{FeedbackRecord, RequestId, Verdict};

/// Why a feedback submission could not be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackError {
    /// No conversation-cache entry for this `request_id` — either it
    /// never existed, or its 24h TTL has already elapsed (`spec.md`
    /// §4.7).
    UnknownRequest,
}

/// Record a user's verdict on a previously returned answer.
///
/// Looks up `request_id` in the conversation cache to recover the
/// provenance a [`FeedbackRecord`] needs, then appends unconditionally —
/// duplicate verdicts for the same `(request_id, user_id)` are accepted
/// at write time and collapsed only at read time via
/// [`lighthouse_cache::FeedbackLog::distinct`] (`spec.md` §4.10).
pub async fn submit_feedback(
    state: &AppState,
    request_id: RequestId,
    user_id: String,
    verdict: Verdict,
) -> Result<(), FeedbackError> {
    let entry = state
        .conversations
        .get(&request_id)
        .await
        .ok_or(FeedbackError::UnknownRequest)?;

    state
        .feedback
        .record(FeedbackRecord {
            request_id,
            thread_key: entry.thread_key,
            user_id,
            verdict,
            question_snapshot: entry.question_snapshot,
            route_mode: entry.route_mode,
            article_count: entry.article_count,
            top_similarity: entry.top_similarity,
        })
        .await;

    Ok(())
}
