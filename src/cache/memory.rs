use super::{CacheBackend, CacheError, CacheStats};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// Process-local cache backend for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(_, e)| e.is_live(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Stores a raw value, bypassing JSON encoding.
    pub async fn insert_raw(&self, key: &str, value: &str, ttl_secs: u64) {
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
    }

    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at.saturating_duration_since(now))
    }
}

#[async_trait::async_trait]
impl CacheBackend for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + Duration::from_secs(ttl_secs),
            },
        );
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let removed = keys
            .iter()
            .filter_map(|k| entries.remove(k))
            .filter(|e| e.is_live(now))
            .count();
        Ok(removed as u64)
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let mut expired = 0;
        entries.retain(|k, e| {
            if !k.starts_with(prefix) {
                return true;
            }
            if !e.is_live(now) {
                expired += 1;
            }
            false
        });
        Ok((before - entries.len() - expired) as u64)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let (keys, bytes) = entries
            .iter()
            .filter(|(_, e)| e.is_live(now))
            .fold((0u64, 0usize), |(n, b), (k, e)| {
                (n + 1, b + k.len() + e.value.len())
            });
        Ok(CacheStats {
            backend: self.name().to_string(),
            keys,
            used_memory: Some(format!("{bytes}B")),
        })
    }
}
