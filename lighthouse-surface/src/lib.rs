//! Chat-event adapter and REST surface for the grounded support
//! assistant (`spec.md` §2, §4.8, §6).
//!
//! This crate owns everything outside the pipeline proper: request
//! validation, the prompt-injection filter, bearer-token auth, rate
//! limiting, the `POST /ask` / `GET /health` routes, the chat-event
//! adapter for non-HTTP renderers, and [`pipeline::run_pipeline`], which
//! wires the agent loop, synthesis, and citation gate into one
//! per-request call.

pub mod auth;
pub mod chat;
pub mod error;
pub mod escalation;
pub mod feedback;
pub mod injection_filter;
pub mod pipeline;
pub mod request_id;
pub mod rest;
pub mod state;
pub mod validation;

pub use auth::{ApiKeyStore, AuthIdentity, BearerAuth, IssuedKey, StaticKey};
pub use chat::{handle_chat_event, ChatEvent};
pub use error::{ApiError, ErrorBody};
pub use escalation::{EscalationTicket, NoopNotifier, NotifyError, TicketNotifier};
pub use feedback::{submit_feedback, FeedbackError};
pub use pipeline::{run_pipeline, PipelineRequest};
pub use rest::create_router;
pub use state::AppState;
pub use validation::{validate, AskBody, AskOptions, ConversationTurn, TurnRole};
