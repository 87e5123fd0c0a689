#![deny(missing_docs)]
//! The agent loop and final synthesis — the heart of the grounded
//! support assistant (`spec.md` §4.4, §4.5).

pub mod error;
pub mod evidence;
pub mod loop_;
pub mod prompts;
pub mod synthesis;

pub use error::AgentError;
pub use evidence::EvidenceSink;
pub use loop_::{run_agent_loop, LoopConfig, LoopOutcome, StopCondition};
pub use prompts::{
    AGENT_SYSTEM_PROMPT, AGENT_SYSTEM_PROMPT_VERSION, FINAL_SYSTEM_PROMPT,
    FINAL_SYSTEM_PROMPT_VERSION,
};
pub use synthesis::{run_synthesis, SynthesisConfig, SynthesisResult, EMPTY_SYNTHESIS_FALLBACK};
