//! Periodic reclamation of expired query cache entries.
//!
//! Expired entries are already invisible to lookups; this job makes the
//! cache apply its pending expirations on a fixed interval, independent of
//! request traffic. Readers holding a payload keep their own `Bytes` handle,
//! so removing an entry never affects a response in flight.

use std::sync::Weak;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::cache::QueryCache;

/// Shortest accepted sweep interval.
const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Run the sweep loop until `cancel` fires or the cache is dropped.
pub async fn run(cache: Weak<QueryCache>, every: Duration, cancel: CancellationToken) {
    let every = every.max(MIN_INTERVAL);
    tracing::info!(interval_secs = every.as_secs(), "Cache sweep job started");

    let mut interval = interval_at(Instant::now() + every, every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cache sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                let Some(cache) = cache.upgrade() else {
                    tracing::debug!("Query cache dropped, cache sweep job exiting");
                    break;
                };
                let remaining = cache.sweep().await;
                tracing::debug!(remaining, "Cache sweep: applied pending expirations");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Bytes;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn exits_when_cache_is_dropped() {
        let cache = Arc::new(QueryCache::new(Duration::from_secs(1)));
        let handle = tokio::spawn(run(
            Arc::downgrade(&cache),
            Duration::from_secs(10),
            CancellationToken::new(),
        ));
        drop(cache);

        tokio::time::timeout(Duration::from_secs(11), handle)
            .await
            .expect("sweeper should exit on its first tick")
            .unwrap();
    }

    #[tokio::test]
    async fn sweeps_on_each_tick() {
        let cache = Arc::new(QueryCache::new(Duration::from_millis(100)));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(Arc::downgrade(&cache), MIN_INTERVAL, cancel.clone()));

        cache.insert("a".into(), Bytes::from_static(b"1")).await;
        assert_eq!(cache.sweep().await, 1);

        // Nothing but the sweeper touches the cache after this point.
        tokio::time::sleep(MIN_INTERVAL + Duration::from_millis(300)).await;
        assert_eq!(cache.counted_entries(), 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
