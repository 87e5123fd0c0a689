//! Chat-event adapter: the non-REST entry point for renderers that speak
//! a bot-mention/thread model rather than plain HTTP (`spec.md` §4.8).
//!
//! Strips a leading bot mention, trims `prior_turns` to the last 10 (≤
//! 300 chars each, the rest discarded rather than erroring — this is an
//! inbound shaping rule, not something a caller can get wrong), and
//! drives the same [`run_pipeline`] the REST surface uses.

use crate::pipeline::{run_pipeline, PipelineRequest};
use crate::request_id::generate_request_id;
use crate::state::AppState;
use crate::validation::{AskOptions, ConversationTurn};
use lighthouse_types::{GroundedAnswer, ThreadKey};

const MAX_PRIOR_TURNS: usize = 10;
const MAX_TURN_CHARS: usize = 300;

/// One inbound chat message from an external renderer (Slack, Teams,
/// ...).
#[derive(Debug, Clone)]
pub struct ChatEvent {
    /// The user who sent the message.
    pub user_id: String,
    /// The thread/channel this message belongs to.
    pub thread_key: ThreadKey,
    /// Raw message text, possibly prefixed with a bot mention.
    pub text: String,
    /// Prior turns in this thread, oldest first.
    pub prior_turns: Vec<ConversationTurn>,
}

/// Strip a leading `@bot-name` mention, if present, and trim
/// surrounding whitespace.
fn strip_mention(text: &str) -> String {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix('@') {
        match rest.find(char::is_whitespace) {
            Some(idx) => rest[idx..].trim_start().to_string(),
            None => String::new(),
        }
    } else {
        trimmed.to_string()
    }
}

/// Truncate `prior_turns` to the last [`MAX_PRIOR_TURNS`], each capped at
/// [`MAX_TURN_CHARS`] characters (keeping the tail of each turn, since
/// the most recent content is the most relevant context).
fn shape_history(prior_turns: &[ConversationTurn]) -> Vec<ConversationTurn> {
    let start = prior_turns.len().saturating_sub(MAX_PRIOR_TURNS);
    prior_turns[start..]
        .iter()
        .map(|turn| ConversationTurn {
            role: turn.role,
            content: truncate_tail(&turn.content, MAX_TURN_CHARS),
        })
        .collect()
}

fn truncate_tail(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        text.chars().skip(char_count - max_chars).collect()
    }
}

/// Handle one [`ChatEvent`]: shape it into a pipeline request and run
/// the pipeline. Returns the grounded answer for the caller to hand to
/// its renderer, alongside the request id used for feedback
/// affordances.
pub async fn handle_chat_event(state: &AppState, event: ChatEvent) -> (lighthouse_types::RequestId, GroundedAnswer) {
    let request_id = generate_request_id();
    let question = strip_mention(&event.text);
    let history = shape_history(&event.prior_turns);

    let answer = run_pipeline(
        state,
        request_id.clone(),
        PipelineRequest {
            question,
            conversation_history: history,
            options: AskOptions::default(),
            thread_key: event.thread_key,
        },
    )
    .await;

    (request_id, answer)
}
