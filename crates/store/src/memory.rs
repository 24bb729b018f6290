//! In-memory document store. The default backend for development and the
//! workhorse for tests; durable deployments use the SQLite backend.

use crate::query;
use async_trait::async_trait;
use contentscout_core::error::StoreError;
use contentscout_core::store::{Document, DocumentStore, FindOptions, normalize_document};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    connected: bool,
    collections: HashMap<String, Vec<Document>>,
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn connect(&self) -> Result<(), StoreError> {
        self.inner.write().await.connected = true;
        tracing::debug!("memory document store connected");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        self.inner.write().await.connected = false;
        Ok(())
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        normalize_document(&mut doc);
        let id = match doc.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                if let Some(map) = doc.as_object_mut() {
                    map.insert("id".into(), Value::String(id.clone()));
                }
                id
            }
        };
        let docs = inner.collections.entry(collection.to_string()).or_default();
        if docs
            .iter()
            .any(|d| d.get("id").and_then(Value::as_str) == Some(id.as_str()))
        {
            return Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            });
        }
        docs.push(doc);
        tracing::debug!(collection, id = %id, "document inserted");
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| query::matches_filter(d, &filter)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let matched: Vec<Document> = inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query::matches_filter(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(query::apply_find_options(matched, &options))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        changes: &Document,
        upsert: bool,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let mut changes = changes.clone();
        normalize_document(&mut changes);

        let docs = inner.collections.entry(collection.to_string()).or_default();
        if let Some(doc) = docs.iter_mut().find(|d| query::matches_filter(d, &filter)) {
            query::apply_changes(doc, &changes);
            return Ok(true);
        }
        if upsert {
            let mut doc = query::merge_for_upsert(&filter, &changes);
            if doc.get("id").is_none()
                && let Some(map) = doc.as_object_mut()
            {
                map.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
            }
            docs.push(doc);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        if let Some(docs) = inner.collections.get_mut(collection)
            && let Some(pos) = docs.iter().position(|d| query::matches_filter(d, &filter))
        {
            docs.remove(pos);
            return Ok(true);
        }
        Ok(false)
    }

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        Ok(inner
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| query::matches_filter(d, &filter))
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Value],
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        if !inner.connected {
            return Err(StoreError::NotConnected);
        }
        let docs = inner
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default();
        query::run_pipeline(docs, pipeline)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.connected)
    }
}
