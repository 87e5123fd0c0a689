//! Append-only feedback log (`spec.md` §3, §4.10).
//!
//! Records are never mutated or removed; a duplicate verdict from the
//! same user for the same `request_id` is simply ignored when reading
//! back, not rejected at write time — the append path stays a single,
//! unconditional push, and de-duplication is a read-side concern
//! (`spec.md` §4.10: "Duplicate verdicts from the same user for the same
//! `request_id` are ignored at read time").

use lighthouse_types::FeedbackRecord;
use std::collections::HashSet;
use tokio::sync::RwLock;

/// Append-only store of [`FeedbackRecord`]s.
pub struct FeedbackLog {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl FeedbackLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a feedback record. Never fails, never deduplicates at
    /// write time.
    pub async fn record(&self, record: FeedbackRecord) {
        self.records.write().await.push(record);
    }

    /// Every record ever appended, including duplicates, in insertion
    /// order.
    pub async fn all(&self) -> Vec<FeedbackRecord> {
        self.records.read().await.clone()
    }

    /// Records with duplicate `(request_id, user_id)` verdicts collapsed,
    /// keeping the first one seen.
    pub async fn distinct(&self) -> Vec<FeedbackRecord> {
        let records = self.records.read().await;
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut out = Vec::new();
        for record in records.iter() {
            let key = (record.request_id.to_string(), record.user_id.clone());
            if seen.insert(key) {
                out.push(record.clone());
            }
        }
        out
    }
}

impl Default for FeedbackLog {
    fn default() -> Self {
        Self::new()
    }
}
