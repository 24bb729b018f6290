//! Storage seams: the document store and cache traits every backend
//! implements, plus the value-normalization helpers they share.
//!
//! Documents are JSON objects (`serde_json::Value`). Backends must gate
//! every operation on an explicit `connect()` call and answer
//! [`StoreError::NotConnected`] / [`CacheError::NotConnected`] before it.

use crate::error::{CacheError, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// A stored document. Always a JSON object at the adapter boundary.
pub type Document = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Query modifiers for [`DocumentStore::find_many`].
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub limit: Option<usize>,
    pub skip: usize,
    /// Applied in order; later keys break ties.
    pub sort: Vec<(String, SortOrder)>,
}

impl FindOptions {
    pub fn limit(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Self::default()
        }
    }

    pub fn sorted_by(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort: vec![(field.into(), order)],
            ..Self::default()
        }
    }
}

/// Document persistence over named collections.
///
/// Filters are JSON objects matched by field equality after
/// [`normalize_document`] has canonicalized both sides.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn connect(&self) -> Result<(), StoreError>;
    async fn disconnect(&self) -> Result<(), StoreError>;

    /// Insert one document, returning its `id` field value.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<String, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Apply `changes` as a field-wise set on the first match.
    /// With `upsert`, a miss inserts `filter` merged with `changes`.
    /// Returns whether anything was written.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        changes: &Document,
        upsert: bool,
    ) -> Result<bool, StoreError>;

    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError>;

    /// Run a small aggregation pipeline: `$match`, `$sort`, `$limit`, and
    /// `$group` with `{_id: "$field", count: {"$sum": 1}}` are supported.
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Value],
    ) -> Result<Vec<Document>, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Key/value cache with TTLs, counters, lists, and hashes.
///
/// Values are JSON: backends serialize objects and arrays as JSON text
/// and scalars as their plain string form ([`encode_cache_value`]), and
/// decode symmetrically ([`decode_cache_value`]).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn connect(&self) -> Result<(), CacheError>;
    async fn disconnect(&self) -> Result<(), CacheError>;

    async fn set(&self, key: &str, value: &Value, ttl_secs: Option<u64>)
        -> Result<(), CacheError>;
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, CacheError>;
    /// Remaining TTL in seconds; `None` when the key has no expiry or is absent.
    async fn ttl(&self, key: &str) -> Result<Option<u64>, CacheError>;

    async fn incr(&self, key: &str, by: i64) -> Result<i64, CacheError>;
    async fn decr(&self, key: &str, by: i64) -> Result<i64, CacheError>;

    async fn lpush(&self, key: &str, value: &Value) -> Result<u64, CacheError>;
    async fn rpush(&self, key: &str, value: &Value) -> Result<u64, CacheError>;
    async fn lpop(&self, key: &str) -> Result<Option<Value>, CacheError>;
    async fn rpop(&self, key: &str) -> Result<Option<Value>, CacheError>;
    async fn llen(&self, key: &str) -> Result<u64, CacheError>;
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>, CacheError>;

    async fn hset(&self, key: &str, field: &str, value: &Value) -> Result<(), CacheError>;
    async fn hget(&self, key: &str, field: &str) -> Result<Option<Value>, CacheError>;
    async fn hgetall(&self, key: &str) -> Result<Vec<(String, Value)>, CacheError>;
    async fn hdel(&self, key: &str, field: &str) -> Result<bool, CacheError>;

    /// Glob-style key listing (`*` wildcard only).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;
    async fn flush(&self) -> Result<(), CacheError>;

    async fn health_check(&self) -> Result<bool, CacheError>;
}

/// Canonicalize UUID-shaped strings anywhere in a document so stored and
/// queried representations compare equal: lowercase, hyphenated form.
/// Recurses through objects and arrays.
pub fn normalize_document(value: &mut Value) {
    match value {
        Value::String(s) => {
            if let Ok(uuid) = Uuid::parse_str(s) {
                *s = uuid.to_string();
            }
        }
        Value::Array(items) => {
            for item in items {
                normalize_document(item);
            }
        }
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                normalize_document(v);
            }
        }
        _ => {}
    }
}

/// Objects and arrays become JSON text; scalars their plain string form.
pub fn encode_cache_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
        other => other.to_string(),
    }
}

/// Inverse of [`encode_cache_value`]: try JSON first, fall back to the
/// raw string verbatim.
pub fn decode_cache_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Match `*`-wildcard patterns the way Redis `KEYS` does for our usage.
pub fn glob_match(pattern: &str, key: &str) -> bool {
    fn inner(p: &[u8], k: &[u8]) -> bool {
        match (p.first(), k.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(&p[1..], k) || (!k.is_empty() && inner(p, &k[1..]))
            }
            (Some(pc), Some(kc)) if pc == kc => inner(&p[1..], &k[1..]),
            _ => false,
        }
    }
    inner(pattern.as_bytes(), key.as_bytes())
}
