//! Request body shape and validation for `POST /ask` (`spec.md` §4.8,
//! §6).

use crate::injection_filter::contains_injection_attempt;
use lighthouse_types::GroundingError;
use serde::{Deserialize, Serialize};

const MAX_QUESTION_CHARS: usize = 2000;
const MAX_TURN_CONTENT_CHARS: usize = 2000;
const MAX_HISTORY_TURNS: usize = 10;

/// One prior turn in `conversation_history`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversationTurn {
    /// Who said it.
    pub role: TurnRole,
    /// The turn's text, capped at [`MAX_TURN_CONTENT_CHARS`].
    pub content: String,
}

/// The speaker of a [`ConversationTurn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The end user.
    User,
    /// The assistant's own prior reply.
    Assistant,
}

/// Optional response-shaping knobs.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AskOptions {
    /// Include the collected evidence articles in the response.
    #[serde(default)]
    pub include_evidence: bool,
    /// Include `detailed_answer` even when it would otherwise be
    /// omitted because it equals `summary`.
    #[serde(default)]
    pub include_technical_details: bool,
}

/// The `POST /ask` request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AskBody {
    /// The user's question, 1..=2000 characters.
    pub question: String,
    /// Up to 10 prior turns, most recent last.
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    /// Response-shaping knobs.
    #[serde(default)]
    pub options: AskOptions,
}

/// Validate an [`AskBody`] against the size and prompt-injection rules
/// of `spec.md` §4.8/§6. Returns the first violation found.
pub fn validate(body: &AskBody) -> Result<(), GroundingError> {
    let question_len = body.question.chars().count();
    if question_len == 0 {
        return Err(GroundingError::Validation("question must not be empty".to_string()));
    }
    if question_len > MAX_QUESTION_CHARS {
        return Err(GroundingError::Validation(format!(
            "question must be at most {MAX_QUESTION_CHARS} characters, got {question_len}"
        )));
    }

    if body.conversation_history.len() > MAX_HISTORY_TURNS {
        return Err(GroundingError::Validation(format!(
            "conversation_history must contain at most {MAX_HISTORY_TURNS} turns, got {}",
            body.conversation_history.len()
        )));
    }

    for (index, turn) in body.conversation_history.iter().enumerate() {
        let len = turn.content.chars().count();
        if len > MAX_TURN_CONTENT_CHARS {
            return Err(GroundingError::Validation(format!(
                "conversation_history[{index}].content must be at most {MAX_TURN_CONTENT_CHARS} characters, got {len}"
            )));
        }
    }

    if contains_injection_attempt(&body.question) {
        return Err(GroundingError::Validation(
            "question matches a disallowed pattern".to_string(),
        ));
    }

    Ok(())
}
