//! Process-local cache-aside store for serialized leaderboard pages.
//!
//! Entries live in a [`moka`] cache with a fixed time-to-live, so an expired
//! page is never returned by a lookup. Entries are immutable once written; a
//! write replaces the whole entry. No lock is held while a page is being
//! computed, so a slow miss on one key does not block lookups of any other
//! key. Two concurrent misses on the same key both compute and the later
//! insert wins.
//!
//! There is no invalidation on score writes: a page can be up to one TTL
//! stale.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use moka::future::Cache;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::background::cache_sweep;

struct Sweeper {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keyed cache of computed pages with a fixed time-to-live.
pub struct QueryCache {
    entries: Cache<String, Bytes>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl QueryCache {
    /// Create an empty cache without a background sweeper.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().time_to_live(ttl).build(),
            sweeper: Mutex::new(None),
        }
    }

    /// Create a cache and spawn its periodic sweep task.
    ///
    /// Must be called from within a tokio runtime. The sweeper only holds a
    /// weak reference, so dropping the last `Arc` also ends it.
    pub fn init(ttl: Duration, sweep_interval: Duration) -> Arc<Self> {
        let cache = Arc::new(Self::new(ttl));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(cache_sweep::run(
            Arc::downgrade(&cache),
            sweep_interval,
            cancel.clone(),
        ));
        *cache.lock_sweeper() = Some(Sweeper { cancel, handle });
        tracing::info!(
            ttl_secs = ttl.as_secs(),
            sweep_interval_secs = sweep_interval.as_secs(),
            "Query cache initialized"
        );
        cache
    }

    /// Stop the sweeper and drop every entry.
    pub async fn shutdown(&self) {
        let sweeper = self.lock_sweeper().take();
        if let Some(sweeper) = sweeper {
            sweeper.cancel.cancel();
            let _ = tokio::time::timeout(Duration::from_secs(5), sweeper.handle).await;
        }
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
        tracing::info!("Query cache shut down");
    }

    /// Return the payload for `key` if a live entry exists.
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        self.entries.get(key).await
    }

    /// Insert or overwrite the entry for `key`, expiring one TTL from now.
    pub async fn insert(&self, key: String, payload: Bytes) {
        self.entries.insert(key, payload).await;
    }

    /// Serve `key` from the cache or compute, store and return it.
    ///
    /// Returns the payload and whether it was a cache hit. A failed compute
    /// stores nothing. If the returned future is dropped mid-compute nothing
    /// is stored either.
    pub async fn fetch<F, Fut, E>(&self, key: &str, compute: F) -> Result<(Bytes, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
    {
        if let Some(payload) = self.get(key).await {
            tracing::debug!(cache_key = key, "Cache hit");
            return Ok((payload, true));
        }

        tracing::debug!(cache_key = key, "Cache miss, computing page");
        let payload = compute().await?;
        self.insert(key.to_string(), payload.clone()).await;
        Ok((payload, false))
    }

    /// Reclaim expired entries. Returns how many entries remain.
    pub async fn sweep(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    /// Number of live entries, after applying pending expirations.
    pub async fn len(&self) -> u64 {
        self.sweep().await
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Entry count as last tallied, without applying pending expirations.
    #[cfg(test)]
    pub(crate) fn counted_entries(&self) -> u64 {
        self.entries.entry_count()
    }

    fn lock_sweeper(&self) -> std::sync::MutexGuard<'_, Option<Sweeper>> {
        self.sweeper.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
