#![deny(missing_docs)]
//! Shared domain types for the grounded support assistant.
//!
//! This crate has no async runtime dependency and no I/O — it is the
//! common vocabulary every other crate in the workspace builds on, the
//! way `layer0` is the common protocol layer for the teacher framework.

pub mod answer;
pub mod corpus;
pub mod error;
pub mod id;
pub mod url_rewrite;

pub use answer::{
    Confidence, EscalationDraft, FeedbackRecord, GroundedAnswer, Provenance, RequestType,
    RouteMode, Verdict,
};
pub use corpus::{Article, ArticleChunk, ChunkMetadata, RetrievalProgramVersion};
pub use error::GroundingError;
pub use id::{KeyId, RequestId, ThreadKey};
pub use url_rewrite::rewrite_to_path;
