//! Redis cache backend over a connection manager.
//!
//! Values go over the wire as strings: objects and arrays as JSON text,
//! scalars plain. Decoding mirrors that, so callers see structured JSON
//! for anything that was stored structured.

use async_trait::async_trait;
use contentscout_core::error::CacheError;
use contentscout_core::store::{CacheStore, decode_cache_value, encode_cache_value};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedisCacheStore {
    url: String,
    manager: RwLock<Option<ConnectionManager>>,
}

impl RedisCacheStore {
    /// Create an unconnected store for the given `redis://` URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            manager: RwLock::new(None),
        }
    }

    async fn conn(&self) -> Result<ConnectionManager, CacheError> {
        self.manager
            .read()
            .await
            .clone()
            .ok_or(CacheError::NotConnected)
    }
}

fn backend_err(e: redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn connect(&self) -> Result<(), CacheError> {
        let mut guard = self.manager.write().await;
        if guard.is_some() {
            return Ok(());
        }
        let client = redis::Client::open(self.url.as_str())
            .map_err(|e| CacheError::Backend(format!("invalid redis url: {e}")))?;
        let manager = tokio::time::timeout(CONNECT_TIMEOUT, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::Backend("redis connect timed out".into()))?
            .map_err(backend_err)?;
        tracing::info!(url = %self.url, "redis cache connected");
        *guard = Some(manager);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), CacheError> {
        self.manager.write().await.take();
        Ok(())
    }

    async fn set(
        &self,
        key: &str,
        value: &Value,
        ttl_secs: Option<u64>,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        let encoded = encode_cache_value(value);
        match ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, encoded, ttl).await,
            None => conn.set::<_, _, ()>(key, encoded).await,
        }
        .map_err(backend_err)
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(key).await.map_err(backend_err)?;
        Ok(raw.map(|s| decode_cache_value(&s)))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.del(key).await.map_err(backend_err)?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        conn.exists(key).await.map_err(backend_err)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        conn.expire(key, ttl_secs as i64).await.map_err(backend_err)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, CacheError> {
        let mut conn = self.conn().await?;
        let remaining: i64 = conn.ttl(key).await.map_err(backend_err)?;
        // -1 means no expiry, -2 means the key is gone.
        Ok((remaining >= 0).then_some(remaining as u64))
    }

    async fn incr(&self, key: &str, by: i64) -> Result<i64, CacheError> {
        let mut conn = self.conn().await?;
        conn.incr(key, by).await.map_err(backend_err)
    }

    async fn decr(&self, key: &str, by: i64) -> Result<i64, CacheError> {
        let mut conn = self.conn().await?;
        conn.decr(key, by).await.map_err(backend_err)
    }

    async fn lpush(&self, key: &str, value: &Value) -> Result<u64, CacheError> {
        let mut conn = self.conn().await?;
        let len: i64 = conn
            .lpush(key, encode_cache_value(value))
            .await
            .map_err(backend_err)?;
        Ok(len as u64)
    }

    async fn rpush(&self, key: &str, value: &Value) -> Result<u64, CacheError> {
        let mut conn = self.conn().await?;
        let len: i64 = conn
            .rpush(key, encode_cache_value(value))
            .await
            .map_err(backend_err)?;
        Ok(len as u64)
    }

    async fn lpop(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.lpop(key, None).await.map_err(backend_err)?;
        Ok(raw.map(|s| decode_cache_value(&s)))
    }

    async fn rpop(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.rpop(key, None).await.map_err(backend_err)?;
        Ok(raw.map(|s| decode_cache_value(&s)))
    }

    async fn llen(&self, key: &str) -> Result<u64, CacheError> {
        let mut conn = self.conn().await?;
        let len: i64 = conn.llen(key).await.map_err(backend_err)?;
        Ok(len as u64)
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: Vec<String> = conn
            .lrange(key, start as isize, stop as isize)
            .await
            .map_err(backend_err)?;
        Ok(raw.iter().map(|s| decode_cache_value(s)).collect())
    }

    async fn hset(&self, key: &str, field: &str, value: &Value) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, field, encode_cache_value(value))
            .await
            .map_err(backend_err)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<Value>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.hget(key, field).await.map_err(backend_err)?;
        Ok(raw.map(|s| decode_cache_value(&s)))
    }

    async fn hgetall(&self, key: &str) -> Result<Vec<(String, Value)>, CacheError> {
        let mut conn = self.conn().await?;
        let raw: HashMap<String, String> = conn.hgetall(key).await.map_err(backend_err)?;
        Ok(raw
            .into_iter()
            .map(|(field, value)| {
                let decoded = decode_cache_value(&value);
                (field, decoded)
            })
            .collect())
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.hdel(key, field).await.map_err(backend_err)?;
        Ok(removed > 0)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn().await?;
        let mut keys: Vec<String> = conn.keys(pattern).await.map_err(backend_err)?;
        keys.sort();
        Ok(keys)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await
            .map_err(backend_err)
    }

    async fn health_check(&self) -> Result<bool, CacheError> {
        let Some(mut conn) = self.manager.read().await.clone() else {
            return Ok(false);
        };
        let pong: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        Ok(pong.is_ok_and(|p| p == "PONG"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Live Redis behavior is covered by the shared CacheStore contract
    // through MemoryCacheStore; here we only pin the unconnected paths.

    #[tokio::test]
    async fn not_connected_before_connect() {
        let cache = RedisCacheStore::new("redis://localhost:6379/0");
        let err = cache.get("k").await.unwrap_err();
        assert!(matches!(err, CacheError::NotConnected));
        assert!(!cache.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn invalid_url_fails_to_connect() {
        let cache = RedisCacheStore::new("not-a-url");
        let err = cache.connect().await.unwrap_err();
        assert!(matches!(err, CacheError::Backend(_)));
    }
}
