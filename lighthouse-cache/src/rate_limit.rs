//! Per-identity rate limiting (`spec.md` §4.8, §5, §8.5).
//!
//! A fixed-window counter keyed by `identity = key_id ?? client_address`:
//! `count <= max` within `[now - window, now]`, reset on window
//! expiration, swept on every write. Same `RwLock<HashMap<..>>` shape as
//! [`crate::conversation::ConversationCache`].

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// `window_ms` / `max_requests` pair, one per deployment (`spec.md` §6
/// configuration).
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Length of the rolling window.
    pub window: Duration,
    /// Maximum requests an identity may make within `window`.
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 60,
        }
    }
}

/// Headers-worthy view of an identity's current bucket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Configured maximum for the window.
    pub limit: u32,
    /// Requests remaining in the current window.
    pub remaining: u32,
    /// Seconds until the window resets.
    pub reset_in_secs: u64,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitOutcome {
    /// The request may proceed.
    Allowed(RateLimitStatus),
    /// The request must be refused with a `Retry-After`.
    Exceeded {
        /// Seconds the caller should wait before retrying.
        retry_after_secs: u64,
        /// Configured maximum for the window, for the response headers.
        limit: u32,
    },
}

struct Bucket {
    count: u32,
    window_start: Instant,
}

/// In-process token-bucket-by-fixed-window rate limiter.
///
/// One bucket per identity (`spec.md` §5: "the rate-limit map is swept
/// on a periodic tick ... and on each write" — this implementation
/// sweeps opportunistically on every write rather than running a
/// separate tick task, since the core has no background scheduler of its
/// own; a periodic sweep is an operational nicety a deployment can add
/// externally without changing this type's contract).
pub struct RateLimiter {
    buckets: RwLock<HashMap<String, Bucket>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Check and, if allowed, consume one request for `identity`.
    pub async fn check(&self, identity: &str) -> RateLimitOutcome {
        let now = Instant::now();
        let mut buckets = self.buckets.write().await;

        buckets.retain(|_, bucket| now.duration_since(bucket.window_start) < self.config.window);

        let bucket = buckets.entry(identity.to_string()).or_insert_with(|| Bucket {
            count: 0,
            window_start: now,
        });

        if now.duration_since(bucket.window_start) >= self.config.window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        let reset_in = self.config.window.saturating_sub(now.duration_since(bucket.window_start));

        if bucket.count >= self.config.max_requests {
            return RateLimitOutcome::Exceeded {
                retry_after_secs: reset_in.as_secs().max(1),
                limit: self.config.max_requests,
            };
        }

        bucket.count += 1;
        RateLimitOutcome::Allowed(RateLimitStatus {
            limit: self.config.max_requests,
            remaining: self.config.max_requests - bucket.count,
            reset_in_secs: reset_in.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_requests_up_to_max_then_refuses() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 2,
        });

        assert!(matches!(limiter.check("key1").await, RateLimitOutcome::Allowed(_)));
        assert!(matches!(limiter.check("key1").await, RateLimitOutcome::Allowed(_)));
        match limiter.check("key1").await {
            RateLimitOutcome::Exceeded { retry_after_secs, limit } => {
                assert!(retry_after_secs <= 60);
                assert_eq!(limit, 2);
            }
            other => panic!("expected Exceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn identities_are_tracked_independently() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 1,
        });

        assert!(matches!(limiter.check("a").await, RateLimitOutcome::Allowed(_)));
        assert!(matches!(limiter.check("b").await, RateLimitOutcome::Allowed(_)));
        assert!(matches!(limiter.check("a").await, RateLimitOutcome::Exceeded { .. }));
    }

    #[tokio::test]
    async fn window_reset_allows_requests_again() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window: Duration::from_millis(10),
            max_requests: 1,
        });

        assert!(matches!(limiter.check("a").await, RateLimitOutcome::Allowed(_)));
        assert!(matches!(limiter.check("a").await, RateLimitOutcome::Exceeded { .. }));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(matches!(limiter.check("a").await, RateLimitOutcome::Allowed(_)));
    }

    #[tokio::test]
    async fn remaining_counts_down() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window: Duration::from_secs(60),
            max_requests: 3,
        });

        let RateLimitOutcome::Allowed(status) = limiter.check("a").await else {
            panic!("expected allowed");
        };
        assert_eq!(status.remaining, 2);
    }
}
