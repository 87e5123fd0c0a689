//! The [`Provider`] trait — the core's only view of the LM/embedding
//! backend (`spec.md` §4.9).
//!
//! Unlike the teacher's `neuron-turn::Provider` (which uses RPITIT and is
//! deliberately not object-safe, because `NeuronTurn<P: Provider>` is
//! generic over it), this trait is `async_trait`-based and object-safe:
//! the request surface holds a single `Arc<dyn Provider>` in its shared
//! `AppState`, and axum handlers need a trait object, not a generic
//! parameter threaded through the whole router. See DESIGN.md.

use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResponse};
use async_trait::async_trait;

/// Byte budget embeddings inputs are truncated to before being sent,
/// per `spec.md` §4.9.
pub const EMBED_TRUNCATE_CHARS: usize = 8000;

/// LM and embedding provider interface.
///
/// `chat` drives the tool-using agent loop; `chat_no_tools` drives final
/// synthesis; `embed` backs `search_articles`. A single provider
/// implementation is expected to offer both chat and embeddings (as
/// Anthropic/OpenAI do), but nothing here requires that — composing two
/// different providers behind one `Provider` impl is a valid strategy.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send a tool-capable chat request.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Send a chat request with no tools available, for final synthesis.
    /// Returns the assistant's text directly.
    async fn chat_no_tools(
        &self,
        system: &str,
        user_message: &str,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, ProviderError>;

    /// Embed `text`, truncating to [`EMBED_TRUNCATE_CHARS`] bytes first.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
}

/// Truncate `text` to at most `EMBED_TRUNCATE_CHARS` characters, on a
/// `char` boundary, before sending it to an embedding endpoint.
pub fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= EMBED_TRUNCATE_CHARS {
        return text;
    }
    let mut end = EMBED_TRUNCATE_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
