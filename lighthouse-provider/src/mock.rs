//! Scripted mock provider for tests.
//!
//! Grounded in the teacher's `test_utils::echo_turn` pattern: a canned,
//! deterministic stand-in for the real network call so the agent loop,
//! citation gate, and surface can be exercised end to end without a live
//! LM or embedding service.

use crate::error::ProviderError;
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse, StopReason, TokenUsage};
use async_trait::async_trait;
use std::sync::Mutex;

/// One scripted step: either a chat response or an error to return.
pub enum ScriptedChat {
    /// Return this response.
    Respond(ChatResponse),
    /// Fail with this error.
    Fail(ProviderError),
}

/// A [`Provider`] that plays back a fixed script of chat responses, and
/// returns a deterministic embedding derived from the input text.
///
/// `chat` pops the next scripted response on each call; calling it more
/// times than the script provides returns a plain end-turn response with
/// empty text, so tests that don't care about the tail of the loop don't
/// need to script every turn.
pub struct MockProvider {
    script: Mutex<Vec<ScriptedChat>>,
    synthesis_text: Mutex<Option<String>>,
}

impl MockProvider {
    /// Create a mock with no scripted responses (every `chat` call
    /// returns an empty end-turn response).
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Vec::new()),
            synthesis_text: Mutex::new(None),
        }
    }

    /// Push a scripted chat response onto the end of the script.
    #[must_use]
    pub fn with_chat(self, step: ScriptedChat) -> Self {
        self.script.lock().unwrap().push(step);
        self
    }

    /// Set the fixed text `chat_no_tools` returns.
    #[must_use]
    pub fn with_synthesis(self, text: impl Into<String>) -> Self {
        *self.synthesis_text.lock().unwrap() = Some(text.into());
        self
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn end_turn(text: impl Into<String>) -> ChatResponse {
    ChatResponse {
        content: vec![crate::types::ContentPart::Text { text: text.into() }],
        stop_reason: StopReason::EndTurn,
        usage: TokenUsage::default(),
        model: "mock".to_string(),
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };

        match next {
            Some(ScriptedChat::Respond(response)) => Ok(response),
            Some(ScriptedChat::Fail(err)) => Err(err),
            None => Ok(end_turn("")),
        }
    }

    async fn chat_no_tools(
        &self,
        _system: &str,
        _user_message: &str,
        _temperature: f64,
        _max_tokens: u32,
    ) -> Result<String, ProviderError> {
        Ok(self
            .synthesis_text
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        // Deterministic "embedding": a hash-derived unit vector. Good
        // enough to exercise similarity search ordering in tests without
        // a real embedding model.
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in text.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x100000001b3);
        }
        let a = (hash & 0xffff) as f32 / 65535.0;
        let b = ((hash >> 16) & 0xffff) as f32 / 65535.0;
        Ok(vec![a, b])
    }
}
