use crate::domain::model::{NormalizedSlot, ProbeGranularity, VendorKind};
use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::Mutex;

/// Cache key for one vendor probe, normalized to the vendor's granularity:
/// day-granularity vendors key on the calendar day, so the fan-out cannot
/// hit them twice for the same day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProbeKey {
    kind: VendorKind,
    location: String,
    instant: String,
}

impl ProbeKey {
    pub fn new(kind: VendorKind, location: &str, probe: DateTime<Utc>) -> Self {
        let instant = match kind.granularity() {
            ProbeGranularity::Daily => probe.format("%Y-%m-%d").to_string(),
            ProbeGranularity::TwoHourly => probe.to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        Self {
            kind,
            location: location.to_string(),
            instant,
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Vec<NormalizedSlot>>>;

/// In-flight fetch de-duplication for one aggregation run.
///
/// The shared handle for a key is registered under the lock before the
/// underlying fetch is first polled, so concurrent duplicates in the same
/// fan-out join one network call instead of issuing their own. One cache is
/// created per run and dropped with it.
pub struct ProbeCache {
    entries: Mutex<HashMap<ProbeKey, SharedFetch>>,
}

impl ProbeCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn get_or_fetch<F>(&self, key: ProbeKey, fetch: F) -> Vec<NormalizedSlot>
    where
        F: Future<Output = Vec<NormalizedSlot>> + Send + 'static,
    {
        let handle = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key)
                .or_insert_with(|| fetch.boxed().shared())
                .clone()
        };
        handle.await
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for ProbeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn key(location: &str, probe: &str) -> ProbeKey {
        ProbeKey::new(
            VendorKind::VenueApi,
            location,
            probe.parse::<DateTime<Utc>>().unwrap(),
        )
    }

    fn counted_fetch(
        calls: Arc<AtomicUsize>,
    ) -> impl Future<Output = Vec<NormalizedSlot>> + Send + 'static {
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Vec::new()
        }
    }

    #[test]
    fn test_daily_keys_truncate_to_calendar_day() {
        assert_eq!(
            key("patcham-tennis", "2025-08-14T12:00:00Z"),
            key("patcham-tennis", "2025-08-14T18:30:00Z")
        );
        assert_ne!(
            key("patcham-tennis", "2025-08-14T12:00:00Z"),
            key("patcham-tennis", "2025-08-15T12:00:00Z")
        );
    }

    #[test]
    fn test_fine_keys_keep_the_full_instant() {
        let a = ProbeKey::new(
            VendorKind::TimetableApi,
            "triangle-padel",
            "2025-08-14T09:00:00Z".parse().unwrap(),
        );
        let b = ProbeKey::new(
            VendorKind::TimetableApi,
            "triangle-padel",
            "2025-08-14T11:00:00Z".parse().unwrap(),
        );
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_join_one_underlying_call() {
        let cache = Arc::new(ProbeCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let fetches = (0..8).map(|_| {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            async move {
                cache
                    .get_or_fetch(key("patcham-tennis", "2025-08-14T12:00:00Z"), counted_fetch(calls))
                    .await
            }
        });
        futures::future::join_all(fetches).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_independently() {
        let cache = ProbeCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(key("patcham-tennis", "2025-08-14T12:00:00Z"), counted_fetch(Arc::clone(&calls)))
            .await;
        cache
            .get_or_fetch(key("patcham-tennis", "2025-08-15T12:00:00Z"), counted_fetch(Arc::clone(&calls)))
            .await;
        cache
            .get_or_fetch(key("hove-tennis", "2025-08-14T12:00:00Z"), counted_fetch(Arc::clone(&calls)))
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len().await, 3);
    }

    #[tokio::test]
    async fn test_repeat_lookup_returns_cached_result_without_refetch() {
        let cache = ProbeCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            cache
                .get_or_fetch(key("patcham-tennis", "2025-08-14T12:00:00Z"), counted_fetch(Arc::clone(&calls)))
                .await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_clear_empties_the_cache() {
        let cache = ProbeCache::new();
        cache
            .get_or_fetch(key("patcham-tennis", "2025-08-14T12:00:00Z"), async { Vec::new() })
            .await;
        assert!(!cache.is_empty().await);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
