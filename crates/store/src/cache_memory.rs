//! In-memory cache with per-key TTLs. Expiry is checked lazily on access,
//! which is enough for the campaign/result caching the pipeline does.

use async_trait::async_trait;
use contentscout_core::error::CacheError;
use contentscout_core::store::{CacheStore, decode_cache_value, encode_cache_value, glob_match};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

enum Slot {
    Scalar(String),
    List(VecDeque<String>),
    Hash(HashMap<String, String>),
}

struct Entry {
    slot: Slot,
    expires_at: Option<Instant>,
}

impl Entry {
    fn scalar(value: String, ttl_secs: Option<u64>) -> Self {
        Self {
            slot: Slot::Scalar(value),
            expires_at: ttl_secs.map(|s| Instant::now() + Duration::from_secs(s)),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Default)]
struct Inner {
    connected: bool,
    entries: HashMap<String, Entry>,
}

impl Inner {
    fn ensure_connected(&self) -> Result<(), CacheError> {
        if self.connected {
            Ok(())
        } else {
            Err(CacheError::NotConnected)
        }
    }

    /// Drop the entry if its TTL has lapsed, then hand it back.
    fn live_entry(&mut self, key: &str) -> Option<&mut Entry> {
        if self.entries.get(key).is_some_and(Entry::is_expired) {
            self.entries.remove(key);
        }
        self.entries.get_mut(key)
    }
}

#[derive(Default)]
pub struct MemoryCacheStore {
    inner: RwLock<Inner>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn connect(&self) -> Result<(), CacheError> {
        self.inner.write().await.connected = true;
        tracing::debug!("memory cache connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), CacheError> {
        self.inner.write().await.connected = false;
        Ok(())
    }

    async fn set(
        &self,
        key: &str,
        value: &Value,
        ttl_secs: Option<u64>,
    ) -> Result<(), CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        inner
            .entries
            .insert(key.to_string(), Entry::scalar(encode_cache_value(value), ttl_secs));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::Scalar(raw),
                ..
            }) => Ok(Some(decode_cache_value(raw))),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "scalar",
            }),
            None => Ok(None),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        Ok(inner.entries.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        Ok(inner.live_entry(key).is_some())
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + Duration::from_secs(ttl_secs));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        Ok(inner.live_entry(key).and_then(|entry| {
            entry
                .expires_at
                .map(|at| at.saturating_duration_since(Instant::now()).as_secs())
        }))
    }

    async fn incr(&self, key: &str, by: i64) -> Result<i64, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        let current = match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::Scalar(raw),
                ..
            }) => raw.parse::<i64>().map_err(|_| CacheError::WrongType {
                key: key.to_string(),
                expected: "integer",
            })?,
            Some(_) => {
                return Err(CacheError::WrongType {
                    key: key.to_string(),
                    expected: "integer",
                });
            }
            None => 0,
        };
        let next = current + by;
        inner
            .entries
            .insert(key.to_string(), Entry::scalar(next.to_string(), None));
        Ok(next)
    }

    async fn decr(&self, key: &str, by: i64) -> Result<i64, CacheError> {
        self.incr(key, -by).await
    }

    async fn lpush(&self, key: &str, value: &Value) -> Result<u64, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        let encoded = encode_cache_value(value);
        // Purge a lapsed entry so it cannot resurrect with stale contents.
        inner.live_entry(key);
        let entry = inner.entries.entry(key.to_string()).or_insert(Entry {
            slot: Slot::List(VecDeque::new()),
            expires_at: None,
        });
        match &mut entry.slot {
            Slot::List(list) => {
                list.push_front(encoded);
                Ok(list.len() as u64)
            }
            _ => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "list",
            }),
        }
    }

    async fn rpush(&self, key: &str, value: &Value) -> Result<u64, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        let encoded = encode_cache_value(value);
        inner.live_entry(key);
        let entry = inner.entries.entry(key.to_string()).or_insert(Entry {
            slot: Slot::List(VecDeque::new()),
            expires_at: None,
        });
        match &mut entry.slot {
            Slot::List(list) => {
                list.push_back(encoded);
                Ok(list.len() as u64)
            }
            _ => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "list",
            }),
        }
    }

    async fn lpop(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::List(list),
                ..
            }) => Ok(list.pop_front().map(|raw| decode_cache_value(&raw))),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "list",
            }),
            None => Ok(None),
        }
    }

    async fn rpop(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::List(list),
                ..
            }) => Ok(list.pop_back().map(|raw| decode_cache_value(&raw))),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "list",
            }),
            None => Ok(None),
        }
    }

    async fn llen(&self, key: &str) -> Result<u64, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::List(list),
                ..
            }) => Ok(list.len() as u64),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "list",
            }),
            None => Ok(0),
        }
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        let list = match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::List(list),
                ..
            }) => list,
            Some(_) => {
                return Err(CacheError::WrongType {
                    key: key.to_string(),
                    expected: "list",
                });
            }
            None => return Ok(Vec::new()),
        };
        let len = list.len() as i64;
        let resolve = |index: i64| -> i64 {
            if index < 0 { len + index } else { index }
        };
        let from = resolve(start).max(0);
        let to = resolve(stop).min(len - 1);
        if from > to {
            return Ok(Vec::new());
        }
        Ok(list
            .iter()
            .skip(from as usize)
            .take((to - from + 1) as usize)
            .map(|raw| decode_cache_value(raw))
            .collect())
    }

    async fn hset(&self, key: &str, field: &str, value: &Value) -> Result<(), CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        let encoded = encode_cache_value(value);
        inner.live_entry(key);
        let entry = inner.entries.entry(key.to_string()).or_insert(Entry {
            slot: Slot::Hash(HashMap::new()),
            expires_at: None,
        });
        match &mut entry.slot {
            Slot::Hash(hash) => {
                hash.insert(field.to_string(), encoded);
                Ok(())
            }
            _ => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "hash",
            }),
        }
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<Value>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::Hash(hash),
                ..
            }) => Ok(hash.get(field).map(|raw| decode_cache_value(raw))),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "hash",
            }),
            None => Ok(None),
        }
    }

    async fn hgetall(&self, key: &str) -> Result<Vec<(String, Value)>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::Hash(hash),
                ..
            }) => Ok(hash
                .iter()
                .map(|(field, raw)| (field.clone(), decode_cache_value(raw)))
                .collect()),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "hash",
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        match inner.live_entry(key) {
            Some(Entry {
                slot: Slot::Hash(hash),
                ..
            }) => Ok(hash.remove(field).is_some()),
            Some(_) => Err(CacheError::WrongType {
                key: key.to_string(),
                expected: "hash",
            }),
            None => Ok(false),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        inner.entries.retain(|_, entry| !entry.is_expired());
        let mut keys: Vec<String> = inner
            .entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut inner = self.inner.write().await;
        inner.ensure_connected()?;
        inner.entries.clear();
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, CacheError> {
        Ok(self.inner.read().await.connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn cache() -> MemoryCacheStore {
        let cache = MemoryCacheStore::new();
        cache.connect().await.unwrap();
        cache
    }

    #[tokio::test]
    async fn not_connected_before_connect() {
        let cache = MemoryCacheStore::new();
        let err = cache.get("k").await.unwrap_err();
        assert!(matches!(err, CacheError::NotConnected));
    }

    #[tokio::test]
    async fn set_get_round_trips_objects() {
        let cache = cache().await;
        let value = json!({"id": "c1", "status": "running", "tasks": [1, 2]});
        cache.set("campaign:c1", &value, None).await.unwrap();
        assert_eq!(cache.get("campaign:c1").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn plain_strings_come_back_as_strings() {
        let cache = cache().await;
        cache
            .set("status", &json!("running"), None)
            .await
            .unwrap();
        assert_eq!(cache.get("status").await.unwrap(), Some(json!("running")));
    }

    #[tokio::test]
    async fn ttl_reports_remaining_seconds() {
        let cache = cache().await;
        cache.set("k", &json!("v"), Some(60)).await.unwrap();
        let remaining = cache.ttl("k").await.unwrap().unwrap();
        assert!(remaining > 0 && remaining <= 60);
        assert_eq!(cache.ttl("no-ttl-key").await.unwrap(), None);

        assert!(cache.delete("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn entries_expire_after_their_ttl() {
        let cache = cache().await;
        cache.set("short", &json!(1), Some(1)).await.unwrap();
        assert!(cache.exists("short").await.unwrap());
        assert!(cache.ttl("short").await.unwrap().is_some());
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert!(!cache.exists("short").await.unwrap());
        assert_eq!(cache.get("short").await.unwrap(), None);
    }

    #[tokio::test]
    async fn keys_without_ttl_never_expire() {
        let cache = cache().await;
        cache.set("stable", &json!(1), None).await.unwrap();
        assert_eq!(cache.ttl("stable").await.unwrap(), None);
        assert!(cache.exists("stable").await.unwrap());
    }

    #[tokio::test]
    async fn counters_start_at_zero() {
        let cache = cache().await;
        assert_eq!(cache.incr("hits", 1).await.unwrap(), 1);
        assert_eq!(cache.incr("hits", 5).await.unwrap(), 6);
        assert_eq!(cache.decr("hits", 2).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn incr_on_non_integer_is_wrong_type() {
        let cache = cache().await;
        cache.set("word", &json!("hello"), None).await.unwrap();
        let err = cache.incr("word", 1).await.unwrap_err();
        assert!(matches!(err, CacheError::WrongType { .. }));
    }

    #[tokio::test]
    async fn list_operations() {
        let cache = cache().await;
        cache.rpush("queue", &json!("a")).await.unwrap();
        cache.rpush("queue", &json!("b")).await.unwrap();
        cache.lpush("queue", &json!("front")).await.unwrap();
        assert_eq!(cache.llen("queue").await.unwrap(), 3);
        assert_eq!(
            cache.lrange("queue", 0, -1).await.unwrap(),
            vec![json!("front"), json!("a"), json!("b")]
        );
        assert_eq!(cache.lpop("queue").await.unwrap(), Some(json!("front")));
        assert_eq!(cache.rpop("queue").await.unwrap(), Some(json!("b")));
    }

    #[tokio::test]
    async fn expired_entries_do_not_resurrect_under_pushes() {
        let cache = cache().await;

        // An expired scalar must not surface as a type clash.
        cache.set("slot", &json!("scalar"), Some(1)).await.unwrap();
        // An expired list must not keep its old elements.
        cache.rpush("queue", &json!("stale")).await.unwrap();
        cache.expire("queue", 1).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(cache.rpush("slot", &json!("fresh")).await.unwrap(), 1);
        assert_eq!(cache.lpush("queue", &json!("new")).await.unwrap(), 1);
        assert_eq!(
            cache.lrange("queue", 0, -1).await.unwrap(),
            vec![json!("new")]
        );
        cache.set("field-holder", &json!("x"), Some(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        cache
            .hset("field-holder", "f", &json!(1))
            .await
            .unwrap();
        assert_eq!(
            cache.hget("field-holder", "f").await.unwrap(),
            Some(json!(1))
        );
    }

    #[tokio::test]
    async fn hash_operations() {
        let cache = cache().await;
        cache
            .hset("agents", "keyword", &json!({"state": "done"}))
            .await
            .unwrap();
        cache
            .hset("agents", "trend", &json!({"state": "running"}))
            .await
            .unwrap();
        assert_eq!(
            cache.hget("agents", "keyword").await.unwrap(),
            Some(json!({"state": "done"}))
        );
        assert_eq!(cache.hgetall("agents").await.unwrap().len(), 2);
        assert!(cache.hdel("agents", "trend").await.unwrap());
        assert!(!cache.hdel("agents", "trend").await.unwrap());
    }

    #[tokio::test]
    async fn keys_filters_by_pattern_and_flush_clears() {
        let cache = cache().await;
        cache.set("campaign:1", &json!(1), None).await.unwrap();
        cache.set("campaign:2", &json!(2), None).await.unwrap();
        cache.set("report:1", &json!(3), None).await.unwrap();
        assert_eq!(
            cache.keys("campaign:*").await.unwrap(),
            vec!["campaign:1".to_string(), "campaign:2".to_string()]
        );
        cache.flush().await.unwrap();
        assert_eq!(cache.keys("*").await.unwrap().len(), 0);
    }
}
