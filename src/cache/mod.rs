//! Cache backends and the read-through orchestrator in front of the store.
//!
//! Backends are blind string stores with per-entry TTLs. [`QueryCache`] adds
//! JSON encoding, metrics and the fail-open policy on top of them.

pub mod keys;
pub mod memory;
pub mod query_cache;
pub mod redis;

pub use keys::CacheKey;
pub use memory::MemoryCache;
pub use query_cache::QueryCache;
pub use redis::RedisCache;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub backend: String,
    pub keys: u64,
    pub used_memory: Option<String>,
}

/// Storage behind the query cache.
///
/// `clear_prefix` is the only bulk-invalidation entry point, so a backend can
/// implement it however it likes (incremental scan, key index, ...).
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError>;

    /// Deletes the given keys, returning how many existed.
    async fn del(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// Deletes every key starting with `prefix`, returning how many were removed.
    async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError>;

    async fn clear_all(&self) -> Result<u64, CacheError> {
        self.clear_prefix("").await
    }

    async fn flush(&self) -> Result<(), CacheError>;

    async fn stats(&self) -> Result<CacheStats, CacheError>;
}
