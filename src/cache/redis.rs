use super::{CacheBackend, CacheError, CacheStats};
use redis::AsyncCommands;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::{debug, info};

/// Redis-backed cache. The connection manager reconnects on its own, so a
/// Redis outage shows up as per-call errors rather than a dead client.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    scan_batch_size: usize,
}

impl RedisCache {
    pub async fn connect(
        url: &str,
        retries: usize,
        scan_batch_size: usize,
    ) -> Result<Self, CacheError> {
        let config = ConnectionManagerConfig::new().set_number_of_retries(retries);

        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager_with_config(config).await?;

        info!("Redis cache connected");
        Ok(Self {
            conn,
            scan_batch_size: scan_batch_size.max(1),
        })
    }

    /// Walks the keyspace with SCAN (never KEYS) and deletes matches batch by batch.
    async fn scan_delete(&self, pattern: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut deleted: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(self.scan_batch_size)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let removed: u64 = conn.del(&keys).await?;
                deleted += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(pattern, deleted, "Scan delete finished");
        Ok(deleted)
    }
}

/// Escapes glob metacharacters so a key prefix matches literally in SCAN MATCH.
fn glob_escape(prefix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn parse_used_memory(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("used_memory_human:"))
        .map(|v| v.trim().to_string())
}

#[async_trait::async_trait]
impl CacheBackend for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: u64 = conn.del(keys.to_vec()).await?;
        Ok(removed)
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        self.scan_delete(&format!("{}*", glob_escape(prefix))).await
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHALL").query_async(&mut conn).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut conn = self.conn.clone();
        let keys: u64 = redis::cmd("DBSIZE").query_async(&mut conn).await?;
        let info: String = redis::cmd("INFO")
            .arg("memory")
            .query_async(&mut conn)
            .await?;

        Ok(CacheStats {
            backend: self.name().to_string(),
            keys,
            used_memory: parse_used_memory(&info),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_escape() {
        assert_eq!(glob_escape("recipes:"), "recipes:");
        assert_eq!(glob_escape("a*b?[c]"), "a\\*b\\?\\[c\\]");
    }

    #[test]
    fn test_parse_used_memory() {
        let info = "# Memory\r\nused_memory:1048576\r\nused_memory_human:1.00M\r\n";
        assert_eq!(parse_used_memory(info).as_deref(), Some("1.00M"));
        assert!(parse_used_memory("# Memory\r\n").is_none());
    }
}
