//! Final synthesis (`spec.md` §4.5).
//!
//! One `chat_no_tools` call with the final system prompt, the question,
//! and the serialized collected articles. No tool registry is involved —
//! this call cannot see or affect collected evidence, it only describes
//! it in the prompt text.

use crate::error::AgentError;
use crate::evidence::EvidenceSink;
use crate::prompts::FINAL_SYSTEM_PROMPT;
use lighthouse_provider::Provider;
use serde::Serialize;

/// The canned message returned when synthesis yields empty text.
pub const EMPTY_SYNTHESIS_FALLBACK: &str =
    "I don't have enough information from our help articles to answer this confidently.";

/// Sampling parameters for the synthesis call.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisConfig {
    /// Low but non-zero, per `spec.md` §4.5.
    pub temperature: f64,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 1024,
        }
    }
}

#[derive(Serialize)]
struct SerializedArticle<'a> {
    path: &'a str,
    title: Option<&'a str>,
    content: &'a str,
}

/// Outcome of a synthesis call.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// The synthesized (or fallback) text.
    pub text: String,
    /// Whether the LM returned empty text and the canned fallback was
    /// substituted.
    pub used_fallback: bool,
}

/// Run final synthesis over `question` and the articles in `evidence`.
pub async fn run_synthesis(
    provider: &dyn Provider,
    question: &str,
    evidence: &EvidenceSink,
    config: SynthesisConfig,
) -> Result<SynthesisResult, AgentError> {
    let serialized: Vec<SerializedArticle> = evidence
        .articles()
        .into_iter()
        .map(|a| SerializedArticle {
            path: &a.path,
            title: a.title.as_deref(),
            content: &a.content,
        })
        .collect();

    let articles_json = serde_json::to_string(&serialized)
        .map_err(|e| AgentError::Other(Box::new(e)))?;

    let user_message = format!("Question: {question}\n\nArticles: {articles_json}");

    let text = provider
        .chat_no_tools(
            FINAL_SYSTEM_PROMPT,
            &user_message,
            config.temperature,
            config.max_tokens,
        )
        .await?;

    if text.trim().is_empty() {
        Ok(SynthesisResult {
            text: EMPTY_SYNTHESIS_FALLBACK.to_string(),
            used_fallback: true,
        })
    } else {
        Ok(SynthesisResult {
            text,
            used_fallback: false,
        })
    }
}
