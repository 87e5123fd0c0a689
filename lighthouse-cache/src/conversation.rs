//! Thread-keyed cache of full answers, so "more details" expansions do
//! not re-run the pipeline (`spec.md` §4.7).
//!
//! Grounded in the same `RwLock<HashMap<..>>` shape as
//! `lighthouse-manifest::ManifestCache` and the teacher's
//! `neuron-state-memory`: one process-local map, guarded by a lock held
//! only across the synchronous read/write, never across an `.await`
//! inside the critical section (`spec.md` §5).

use lighthouse_types::{RequestId, RouteMode, ThreadKey};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A cached expansion: the full answer text produced for one request,
/// plus enough provenance to build a [`lighthouse_types::FeedbackRecord`]
/// later without re-running the pipeline (`spec.md` §4.7, §4.10).
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    /// Full answer text (the `detailed_answer`, or `summary` if no
    /// separate detail was produced).
    pub detailed_answer: String,
    /// The thread this answer was produced for.
    pub thread_key: ThreadKey,
    /// The question text at the time of the request.
    pub question_snapshot: String,
    /// How the request was routed.
    pub route_mode: RouteMode,
    /// Number of distinct articles in collected evidence.
    pub article_count: usize,
    /// Best similarity score observed, if any search was performed.
    pub top_similarity: Option<f32>,
}

struct Entry {
    value: ConversationEntry,
    created_at: Instant,
}

/// Process-local `request_id -> ConversationEntry` cache with a fixed
/// TTL and an opportunistic sweep on every insert.
pub struct ConversationCache {
    entries: RwLock<HashMap<RequestId, Entry>>,
    ttl: Duration,
}

impl ConversationCache {
    /// Create a cache with the given TTL (`spec.md` §4.7 default 24h).
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Store the full answer for `request_id`, evicting any entries past
    /// their TTL while the write lock is already held.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        &self,
        request_id: RequestId,
        detailed_answer: String,
        thread_key: ThreadKey,
        question_snapshot: String,
        route_mode: RouteMode,
        article_count: usize,
        top_similarity: Option<f32>,
    ) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| now.duration_since(entry.created_at) < self.ttl);
        entries.insert(
            request_id,
            Entry {
                value: ConversationEntry {
                    detailed_answer,
                    thread_key,
                    question_snapshot,
                    route_mode,
                    article_count,
                    top_similarity,
                },
                created_at: now,
            },
        );
    }

    /// Look up the cached expansion for `request_id`, if present and not
    /// expired. Byte-identical across repeated calls within TTL
    /// (testable property: idempotence of expansion, `spec.md` §8.7).
    pub async fn get(&self, request_id: &RequestId) -> Option<ConversationEntry> {
        let entries = self.entries.read().await;
        let entry = entries.get(request_id)?;
        if Instant::now().duration_since(entry.created_at) >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Number of live entries, for tests/diagnostics. Does not sweep.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: &str) -> RequestId {
        RequestId::new(id)
    }

    fn thread(key: &str) -> ThreadKey {
        ThreadKey::new(key)
    }

    async fn insert(cache: &ConversationCache, id: &str, text: &str, thread_id: &str) {
        cache
            .insert(
                req(id),
                text.to_string(),
                thread(thread_id),
                "does it support X?".to_string(),
                RouteMode::Grounded,
                1,
                Some(0.9),
            )
            .await;
    }

    #[tokio::test]
    async fn stores_and_retrieves_entry() {
        let cache = ConversationCache::new(Duration::from_secs(3600));
        insert(&cache, "r1", "full answer text", "t1").await;

        let entry = cache.get(&req("r1")).await.unwrap();
        assert_eq!(entry.detailed_answer, "full answer text");
        assert_eq!(entry.thread_key, thread("t1"));
        assert_eq!(entry.article_count, 1);
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let cache = ConversationCache::new(Duration::from_secs(3600));
        assert!(cache.get(&req("nope")).await.is_none());
    }

    #[tokio::test]
    async fn expired_entry_is_not_returned() {
        let cache = ConversationCache::new(Duration::from_millis(1));
        insert(&cache, "r1", "text", "t1").await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.get(&req("r1")).await.is_none());
    }

    #[tokio::test]
    async fn repeated_gets_within_ttl_are_byte_identical() {
        let cache = ConversationCache::new(Duration::from_secs(3600));
        insert(&cache, "r1", "stable text", "t1").await;

        let first = cache.get(&req("r1")).await.unwrap();
        let second = cache.get(&req("r1")).await.unwrap();
        assert_eq!(first.detailed_answer, second.detailed_answer);
    }

    #[tokio::test]
    async fn insert_sweeps_expired_entries() {
        let cache = ConversationCache::new(Duration::from_millis(1));
        insert(&cache, "old", "stale", "t1").await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        insert(&cache, "new", "fresh", "t2").await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&req("new")).await.is_some());
    }
}
