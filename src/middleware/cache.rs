use moka::future::Cache;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tokio::time::Instant;

use crate::session::Session;

/// A resolved session (possibly none) and when it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub session: Option<Session>,
    pub inserted_at: Instant,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

/// Short-lived memo of session lookups keyed by cookie and path.
///
/// Backed by a bounded `moka` cache with the same time-to-live. Entries are
/// replaced wholesale, never edited. Each entry also carries its insert time
/// on the tokio clock so freshness follows the runtime's notion of time.
#[derive(Clone)]
pub struct SessionCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
}

impl SessionCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity.max(1) as u64)
            .time_to_live(ttl)
            .build();

        Self { entries, ttl }
    }

    /// Cookies are hashed so raw credentials never sit in memory.
    pub fn key(cookie: &str, path: &str) -> String {
        let digest = Sha256::digest(cookie.as_bytes());
        format!("{:x}-{}", digest, path)
    }

    /// Fresh entry for `key`, if any. Stale entries are dropped on sight.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.get(key).await?;
        if entry.is_fresh(self.ttl) {
            return Some(entry);
        }
        self.entries.invalidate(key).await;
        None
    }

    pub async fn insert(&self, key: String, session: Option<Session>) {
        self.entries
            .insert(
                key,
                CacheEntry {
                    session,
                    inserted_at: Instant::now(),
                },
            )
            .await;
    }

    /// Entry count after pending evictions have been applied
    pub async fn len(&self) -> usize {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count() as usize
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
