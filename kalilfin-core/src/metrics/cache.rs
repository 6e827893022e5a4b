//! In-memory LRU cache of assembled metrics, keyed by ticker.
//!
//! - Bounded: inserting past capacity evicts the least recently used entry.
//! - No expiry. Entries leave only through eviction, [`invalidate`] or [`clear`].
//! - Failures are never stored; the next request for that ticker recomputes.
//! - At most one computation per ticker is in flight. Concurrent callers for
//!   the same ticker block on a per-key lock and then read the stored result.
//!
//! [`invalidate`]: MetricsCache::invalidate
//! [`clear`]: MetricsCache::clear

use super::assembler::MetricsSource;
use super::error::MetricsError;
use crate::domain::{normalize_ticker, StockMetrics};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

struct Slot {
    metrics: Arc<StockMetrics>,
    stamp: u64,
}

/// Recency bookkeeping: `order` maps a monotonically increasing stamp to the
/// key last touched at that stamp, so the first entry is the LRU victim.
#[derive(Default)]
struct LruState {
    entries: HashMap<String, Slot>,
    order: BTreeMap<u64, String>,
    clock: u64,
}

impl LruState {
    fn next_stamp(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn get(&mut self, key: &str) -> Option<Arc<StockMetrics>> {
        let stamp = self.next_stamp();
        let slot = self.entries.get_mut(key)?;
        self.order.remove(&slot.stamp);
        slot.stamp = stamp;
        self.order.insert(stamp, key.to_string());
        Some(Arc::clone(&slot.metrics))
    }

    /// Insert or replace; returns the evicted key, if any.
    fn insert(
        &mut self,
        key: &str,
        metrics: Arc<StockMetrics>,
        capacity: usize,
    ) -> Option<String> {
        let stamp = self.next_stamp();
        if let Some(old) = self.entries.insert(key.to_string(), Slot { metrics, stamp }) {
            self.order.remove(&old.stamp);
        }
        self.order.insert(stamp, key.to_string());

        if self.entries.len() > capacity {
            let (_, victim) = self.order.pop_first()?;
            self.entries.remove(&victim);
            return Some(victim);
        }
        None
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(slot) => {
                self.order.remove(&slot.stamp);
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Memoizing front for a [`MetricsSource`].
pub struct MetricsCache<S> {
    source: S,
    capacity: usize,
    state: Mutex<LruState>,
    key_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: MetricsSource> MetricsCache<S> {
    pub const DEFAULT_CAPACITY: usize = 128;

    /// Cache holding at most `capacity` tickers (minimum 1).
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity: capacity.max(1),
            state: Mutex::new(LruState::default()),
            key_locks: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `ticker` is cached. Does not affect recency.
    pub fn contains(&self, ticker: &str) -> bool {
        match normalize_ticker(ticker) {
            Ok(key) => lock(&self.state).entries.contains_key(&key),
            Err(_) => false,
        }
    }

    /// Cached record for `ticker`, without computing on a miss.
    pub fn get(&self, ticker: &str) -> Option<Arc<StockMetrics>> {
        let key = normalize_ticker(ticker).ok()?;
        lock(&self.state).get(&key)
    }

    /// Cached record for `ticker`, computing and storing it on a miss.
    pub fn get_or_compute(&self, ticker: &str) -> Result<Arc<StockMetrics>, MetricsError> {
        let key = normalize_ticker(ticker).map_err(|e| MetricsError::NotFound {
            ticker: ticker.trim().to_string(),
            reason: e.to_string(),
        })?;

        if let Some(hit) = lock(&self.state).get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(ticker = %key, "metrics cache hit");
            return Ok(hit);
        }

        let key_lock = self.key_lock(&key);
        let result = {
            let _in_flight = lock(&key_lock);
            // Another caller may have finished while we waited.
            let cached = lock(&self.state).get(&key);
            match cached {
                Some(hit) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(ticker = %key, "metrics cache hit after wait");
                    Ok(hit)
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(ticker = %key, "metrics cache miss");
                    self.source.assemble(&key).map(|metrics| {
                        let metrics = Arc::new(metrics);
                        self.store(&key, Arc::clone(&metrics));
                        metrics
                    })
                }
            }
        };
        self.release_key_lock(&key, &key_lock);
        result
    }

    /// Drop the cached record for `ticker`. Returns whether one existed.
    pub fn invalidate(&self, ticker: &str) -> bool {
        let Ok(key) = normalize_ticker(ticker) else {
            return false;
        };
        let removed = lock(&self.state).remove(&key);
        if removed {
            debug!(ticker = %key, "metrics cache entry invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        lock(&self.state).clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            len: self.len(),
            capacity: self.capacity,
        }
    }

    fn store(&self, key: &str, metrics: Arc<StockMetrics>) {
        let evicted = lock(&self.state).insert(key, metrics, self.capacity);
        if let Some(victim) = evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(ticker = %victim, "evicted least recently used metrics");
        }
    }

    fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            lock(&self.key_locks)
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Forget the per-key lock once no other caller holds it.
    fn release_key_lock(&self, key: &str, key_lock: &Arc<Mutex<()>>) {
        let mut locks = lock(&self.key_locks);
        // One reference in the map, one held by the caller.
        if Arc::strong_count(key_lock) <= 2 {
            locks.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, EcoScore, Forecast};
    use chrono::{NaiveDate, Utc};
    use std::sync::atomic::AtomicUsize;

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn metrics(ticker: &str) -> StockMetrics {
        StockMetrics {
            ticker: ticker.to_string(),
            name: ticker.to_string(),
            price: 1.0,
            sma20: None,
            rsi14: None,
            change_pct: None,
            volume: 0,
            decision: Decision::Hold,
            chart_series: vec![1.0],
            forecast: Forecast {
                horizon_days: 7,
                target_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                predicted_close: 1.0,
            },
            eco_score: EcoScore::DEFAULT,
            fetched_at: Utc::now(),
        }
    }

    impl MetricsSource for Counting {
        fn assemble(&self, ticker: &str) -> Result<StockMetrics, MetricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(MetricsError::Upstream {
                    ticker: ticker.to_string(),
                    reason: "503".into(),
                });
            }
            Ok(metrics(ticker))
        }
    }

    #[test]
    fn second_request_is_a_hit() {
        let cache = MetricsCache::new(Counting::new(), 4);
        let a = cache.get_or_compute("AAPL").unwrap();
        let b = cache.get_or_compute("aapl ").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.source().calls(), 1);
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn invalidate_forces_recompute() {
        let cache = MetricsCache::new(Counting::new(), 4);
        cache.get_or_compute("AAPL").unwrap();
        assert!(cache.invalidate("AAPL"));
        assert!(!cache.invalidate("AAPL"));
        cache.get_or_compute("AAPL").unwrap();
        assert_eq!(cache.source().calls(), 2);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = MetricsCache::new(Counting::new(), 2);
        cache.get_or_compute("A").unwrap();
        cache.get_or_compute("B").unwrap();
        // Touch A so B becomes the oldest.
        cache.get_or_compute("A").unwrap();
        cache.get_or_compute("C").unwrap();
        assert!(cache.contains("A"));
        assert!(!cache.contains("B"));
        assert!(cache.contains("C"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let source = Counting {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let cache = MetricsCache::new(source, 4);
        assert!(cache.get_or_compute("AAPL").is_err());
        assert!(cache.get_or_compute("AAPL").is_err());
        assert_eq!(cache.source().calls(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalid_ticker_skips_source() {
        let cache = MetricsCache::new(Counting::new(), 4);
        let err = cache.get_or_compute("").unwrap_err();
        assert!(matches!(err, MetricsError::NotFound { .. }));
        assert_eq!(cache.source().calls(), 0);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = MetricsCache::new(Counting::new(), 0);
        assert_eq!(cache.capacity(), 1);
        cache.get_or_compute("A").unwrap();
        cache.get_or_compute("B").unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn get_does_not_compute() {
        let cache = MetricsCache::new(Counting::new(), 4);
        assert!(cache.get("AAPL").is_none());
        assert_eq!(cache.source().calls(), 0);
    }

    #[test]
    fn key_locks_are_released() {
        let cache = MetricsCache::new(Counting::new(), 4);
        cache.get_or_compute("AAPL").unwrap();
        assert!(lock(&cache.key_locks).is_empty());
    }
}
