use super::{CacheBackend, CacheError, CacheStats};
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};

type Slot = Arc<tokio::sync::Mutex<()>>;

/// Per-key async locks held while a miss is being computed.
#[derive(Debug, Default)]
pub struct SingleFlight {
    inflight: Mutex<HashMap<String, Slot>>,
}

impl SingleFlight {
    pub async fn acquire(&self, key: &str) -> FlightGuard<'_> {
        let slot = self
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone();

        FlightGuard {
            owner: self,
            key: key.to_string(),
            permit: slot.lock_owned().await,
        }
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct FlightGuard<'a> {
    owner: &'a SingleFlight,
    key: String,
    permit: OwnedMutexGuard<()>,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut inflight = self
            .owner
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Map entry plus our permit: nobody else is waiting on this key.
        if Arc::strong_count(OwnedMutexGuard::mutex(&self.permit)) <= 2 {
            inflight.remove(&self.key);
        }
    }
}

/// Read-through JSON cache over a [`CacheBackend`].
///
/// Reads and writes fail open: a backend error or an undecodable entry is
/// logged, counted and treated as a miss. Only the admin passthroughs
/// (`clear_prefix`, `clear_all`, `flush`, `stats`) report errors.
pub struct QueryCache {
    backend: Arc<dyn CacheBackend>,
    flights: Option<SingleFlight>,
}

impl QueryCache {
    #[must_use]
    pub fn new(backend: Arc<dyn CacheBackend>, single_flight: bool) -> Self {
        Self {
            backend,
            flights: single_flight.then(SingleFlight::default),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    pub async fn get_json<T: DeserializeOwned>(&self, resource: &'static str, key: &str) -> Option<T> {
        match self.backend.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    debug!(key, "Cache hit");
                    counter!("pantry_cache_lookups_total", "resource" => resource, "outcome" => "hit")
                        .increment(1);
                    Some(value)
                }
                Err(e) => {
                    warn!(key, error = %e, "Discarding undecodable cache entry");
                    counter!("pantry_cache_lookups_total", "resource" => resource, "outcome" => "corrupt")
                        .increment(1);
                    None
                }
            },
            Ok(None) => {
                debug!(key, "Cache miss");
                counter!("pantry_cache_lookups_total", "resource" => resource, "outcome" => "miss")
                    .increment(1);
                None
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed, falling through to store");
                counter!("pantry_cache_errors_total", "op" => "get").increment(1);
                None
            }
        }
    }

    pub async fn put_json<T: Serialize + Sync>(&self, key: &str, ttl_secs: u64, value: &T) {
        let result = match serde_json::to_string(value) {
            Ok(raw) => self.backend.set_ex(key, &raw, ttl_secs).await,
            Err(e) => Err(CacheError::from(e)),
        };

        if let Err(e) = result {
            warn!(key, error = %e, "Cache write failed");
            counter!("pantry_cache_errors_total", "op" => "set").increment(1);
        }
    }

    /// Best-effort delete of specific keys.
    pub async fn invalidate(&self, keys: &[String]) {
        match self.backend.del(keys).await {
            Ok(removed) => debug!(?keys, removed, "Cache keys invalidated"),
            Err(e) => {
                warn!(?keys, error = %e, "Cache invalidation failed");
                counter!("pantry_cache_errors_total", "op" => "del").increment(1);
            }
        }
    }

    /// Returns the cached value for `key`, or runs `compute`, stores its
    /// result for `ttl_secs` and returns it.
    ///
    /// With single-flight enabled, concurrent misses on the same key wait for
    /// the first computation and then read its result from the cache.
    pub async fn get_or_compute<T, E, F, Fut>(
        &self,
        resource: &'static str,
        key: &str,
        ttl_secs: u64,
        compute: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.get_json(resource, key).await {
            return Ok(hit);
        }

        let _guard = match &self.flights {
            Some(flights) => {
                let guard = flights.acquire(key).await;
                if let Some(hit) = self.get_json(resource, key).await {
                    return Ok(hit);
                }
                Some(guard)
            }
            None => None,
        };

        let value = compute().await?;
        self.put_json(key, ttl_secs, &value).await;
        Ok(value)
    }

    pub async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.backend.clear_prefix(prefix).await
    }

    pub async fn clear_all(&self) -> Result<u64, CacheError> {
        self.backend.clear_all().await
    }

    pub async fn flush(&self) -> Result<(), CacheError> {
        self.backend.flush().await
    }

    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        self.backend.stats().await
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flights.as_ref().map_or(0, SingleFlight::in_flight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn cache(single_flight: bool) -> (Arc<MemoryCache>, QueryCache) {
        let backend = Arc::new(MemoryCache::new());
        let cache = QueryCache::new(backend.clone(), single_flight);
        (backend, cache)
    }

    #[tokio::test]
    async fn test_roundtrip_and_delete() {
        let (_, cache) = cache(true);
        cache.put_json("tags:all", 60, &vec![1, 2, 3]).await;
        let hit: Option<Vec<i32>> = cache.get_json("tags", "tags:all").await;
        assert_eq!(hit, Some(vec![1, 2, 3]));

        cache.invalidate(&["tags:all".to_string()]).await;
        let miss: Option<Vec<i32>> = cache.get_json("tags", "tags:all").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_recomputed_and_overwritten() {
        let (backend, cache) = cache(false);
        backend.insert_raw("recipe:1:", "{not json", 60).await;

        let value: Result<i32, CacheError> = cache
            .get_or_compute("recipe", "recipe:1:", 60, || async { Ok(42) })
            .await;
        assert_eq!(value.unwrap(), 42);
        assert_eq!(
            backend.get("recipe:1:").await.unwrap().as_deref(),
            Some("42")
        );
    }

    #[tokio::test]
    async fn test_single_flight_collapses_concurrent_misses() {
        let (_, cache) = cache(true);
        let cache = Arc::new(cache);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute("recipes", "recipes:en:k", 60, || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, CacheError>(7)
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let (backend, cache) = cache(true);
        let result: Result<i32, String> = cache
            .get_or_compute("recipes", "recipes:x", 60, || async { Err("boom".to_string()) })
            .await;
        assert!(result.is_err());
        assert!(backend.keys().await.is_empty());
        assert_eq!(cache.in_flight(), 0);
    }
}
