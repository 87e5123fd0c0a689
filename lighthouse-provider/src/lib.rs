#![deny(missing_docs)]
//! LM and embedding provider contract for the grounded support assistant.
//!
//! [`Provider`] is the core's only view of the LM/embedding backend
//! (`spec.md` §4.9). [`AnthropicProvider`] is a concrete HTTP
//! implementation; [`MockProvider`] is a scripted test double.

pub mod anthropic;
pub mod error;
pub mod mock;
pub mod provider;
pub mod types;

pub use anthropic::AnthropicProvider;
pub use error::ProviderError;
pub use mock::{MockProvider, ScriptedChat};
pub use provider::{truncate_for_embedding, Provider, EMBED_TRUNCATE_CHARS};
pub use types::{
    ChatRequest, ChatResponse, ContentPart, ProviderMessage, Role, StopReason, TokenUsage,
    ToolSchema,
};
