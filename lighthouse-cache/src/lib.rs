#![deny(missing_docs)]
//! Process-local stores for the grounded support assistant: conversation
//! cache, rate limiter, and feedback log (`spec.md` §4.7, §4.8, §4.10).
//!
//! All three are owned by the request surface and live for the lifetime
//! of the process — none of them is backed by external storage. Each is
//! a `RwLock`-guarded map in the same shape as
//! [`lighthouse_manifest::ManifestCache`], critical sections held only
//! across synchronous work, never across an `.await` (`spec.md` §5).

pub mod conversation;
pub mod feedback;
pub mod rate_limit;

pub use conversation::{ConversationCache, ConversationEntry};
pub use feedback::FeedbackLog;
pub use rate_limit::{RateLimitConfig, RateLimitOutcome, RateLimitStatus, RateLimiter};
