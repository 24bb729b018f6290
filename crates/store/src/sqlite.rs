//! Durable SQLite document store.
//!
//! Documents live in a single `documents` table keyed by collection and
//! id, with the payload stored as JSON text. Equality filters and sorts
//! are applied over the fetched collection; the workload here is small
//! per-campaign result sets, not analytical scans.

use crate::query;
use async_trait::async_trait;
use contentscout_core::error::StoreError;
use contentscout_core::store::{Document, DocumentStore, FindOptions, normalize_document};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct SqliteDocumentStore {
    path: PathBuf,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteDocumentStore {
    /// Create an unconnected store for the given database file.
    /// Pass `":memory:"` for an in-process ephemeral database.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> Result<SqlitePool, StoreError> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or(StoreError::NotConnected)
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                id          TEXT NOT NULL,
                doc         TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| StoreError::Backend(format!("documents table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        )
        .execute(pool)
        .await
        .map_err(|e| StoreError::Backend(format!("collection index: {e}")))?;

        Ok(())
    }

    /// Load every document in a collection, already deserialized.
    async fn load_collection(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let pool = self.pool().await?;
        let started = Instant::now();
        let rows = sqlx::query("SELECT doc FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_all(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let docs = rows
            .iter()
            .map(|row| {
                let raw: String = row.get("doc");
                serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect::<Result<Vec<Document>, _>>()?;
        tracing::debug!(
            collection,
            count = docs.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection loaded"
        );
        Ok(docs)
    }

    async fn write_doc(&self, collection: &str, id: &str, doc: &Document) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        sqlx::query("UPDATE documents SET doc = ? WHERE collection = ? AND id = ?")
            .bind(doc.to_string())
            .bind(collection)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn connect(&self) -> Result<(), StoreError> {
        let mut guard = self.pool.write().await;
        if guard.is_some() {
            return Ok(());
        }
        let in_memory = self.path == Path::new(":memory:");
        let path = if in_memory {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", self.path.display())
        };
        let options = SqliteConnectOptions::from_str(&path)
            .map_err(|e| StoreError::Backend(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // An in-memory database lives inside its one connection; a wider
        // pool would give every pooled connection a separate empty
        // database, and idle reaping would drop the data outright.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(4)
        };
        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to open SQLite: {e}")))?;

        Self::run_migrations(&pool).await?;
        tracing::info!(path = %self.path.display(), "SQLite document store connected");
        *guard = Some(pool);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), StoreError> {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
        }
        Ok(())
    }

    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let pool = self.pool().await?;
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
        let result = sqlx::query("INSERT INTO documents (collection, id, doc) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&id)
            .bind(doc.to_string())
            .execute(&pool)
            .await;
        match result {
            Ok(_) => Ok(id),
            Err(e) if e.to_string().contains("UNIQUE constraint") => Err(StoreError::Duplicate {
                collection: collection.to_string(),
                id,
            }),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut filter = filter.clone();
        normalize_document(&mut filter);

        // Fast path when the filter pins the primary key.
        if let Some(id) = filter.get("id").and_then(Value::as_str)
            && filter.as_object().is_some_and(|m| m.len() == 1)
        {
            let pool = self.pool().await?;
            let row = sqlx::query("SELECT doc FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id)
                .fetch_optional(&pool)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            return row
                .map(|row| {
                    let raw: String = row.get("doc");
                    serde_json::from_str(&raw)
                        .map_err(|e| StoreError::Serialization(e.to_string()))
                })
                .transpose();
        }

        let docs = self.load_collection(collection).await?;
        Ok(docs.into_iter().find(|d| query::matches_filter(d, &filter)))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Document,
        options: FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let docs = self.load_collection(collection).await?;
        let matched = docs
            .into_iter()
            .filter(|d| query::matches_filter(d, &filter))
            .collect();
        Ok(query::apply_find_options(matched, &options))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        changes: &Document,
        upsert: bool,
    ) -> Result<bool, StoreError> {
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let mut changes = changes.clone();
        normalize_document(&mut changes);

        if let Some(mut doc) = self.find_one(collection, &filter).await? {
            query::apply_changes(&mut doc, &changes);
            let id = doc
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::Backend("stored document lost its id".into()))?
                .to_string();
            self.write_doc(collection, &id, &doc).await?;
            return Ok(true);
        }
        if upsert {
            let doc = query::merge_for_upsert(&filter, &changes);
            self.insert_one(collection, doc).await?;
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_one(&self, collection: &str, filter: &Document) -> Result<bool, StoreError> {
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let Some(doc) = self.find_one(collection, &filter).await? else {
            return Ok(false);
        };
        let id = doc.get("id").and_then(Value::as_str).unwrap_or_default();
        let pool = self.pool().await?;
        let result = sqlx::query("DELETE FROM documents WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self, collection: &str, filter: &Document) -> Result<u64, StoreError> {
        if filter.as_object().is_some_and(|m| m.is_empty()) {
            let pool = self.pool().await?;
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
                    .bind(collection)
                    .fetch_one(&pool)
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
            return Ok(count as u64);
        }
        let mut filter = filter.clone();
        normalize_document(&mut filter);
        let docs = self.load_collection(collection).await?;
        Ok(docs
            .iter()
            .filter(|d| query::matches_filter(d, &filter))
            .count() as u64)
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Value],
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.load_collection(collection).await?;
        query::run_pipeline(docs, pipeline)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        match self.pool.read().await.as_ref() {
            Some(pool) => Ok(sqlx::query("SELECT 1").execute(pool).await.is_ok()),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn store() -> SqliteDocumentStore {
        let store = SqliteDocumentStore::new(":memory:");
        store.connect().await.unwrap();
        store
    }

    #[tokio::test]
    async fn not_connected_before_connect() {
        let store = SqliteDocumentStore::new(":memory:");
        let err = store.find_one("campaigns", &json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::NotConnected));
        assert!(!store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn insert_find_update_delete_cycle() {
        let store = store().await;
        let id = store
            .insert_one("campaigns", json!({"name": "launch", "status": "pending"}))
            .await
            .unwrap();

        let found = store
            .find_one("campaigns", &json!({"id": id}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["name"], "launch");

        assert!(
            store
                .update_one(
                    "campaigns",
                    &json!({"id": id}),
                    &json!({"status": "running"}),
                    false,
                )
                .await
                .unwrap()
        );
        let found = store
            .find_one("campaigns", &json!({"status": "running"}))
            .await
            .unwrap();
        assert!(found.is_some());

        assert!(store.delete_one("campaigns", &json!({"id": id})).await.unwrap());
        assert_eq!(store.count("campaigns", &json!({})).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn in_memory_data_survives_concurrent_access() {
        // Every pooled connection to sqlite::memory: is its own database;
        // the pool must stay on a single connection or writes vanish.
        let store = std::sync::Arc::new(store().await);
        store
            .insert_one("campaigns", json!({"id": "pinned"}))
            .await
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move { store.count("campaigns", &json!({})).await.unwrap() })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1);
        }
        assert!(
            store
                .find_one("campaigns", &json!({"id": "pinned"}))
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn duplicate_primary_key_maps_to_duplicate_error() {
        let store = store().await;
        store
            .insert_one("campaigns", json!({"id": "same"}))
            .await
            .unwrap();
        let err = store
            .insert_one("campaigns", json!({"id": "same"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = store().await;
        store
            .insert_one("campaigns", json!({"id": "x"}))
            .await
            .unwrap();
        store
            .insert_one("final_reports", json!({"id": "x"}))
            .await
            .unwrap();
        assert_eq!(store.count("campaigns", &json!({})).await.unwrap(), 1);
        assert_eq!(store.count("final_reports", &json!({})).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn aggregate_groups_by_field() {
        let store = store().await;
        for (id, status) in [("a", "running"), ("b", "failed"), ("c", "running")] {
            store
                .insert_one("campaigns", json!({"id": id, "status": status}))
                .await
                .unwrap();
        }
        let mut grouped = store
            .aggregate(
                "campaigns",
                &[json!({"$group": {"_id": "$status", "count": {"$sum": 1}}})],
            )
            .await
            .unwrap();
        grouped.sort_by_key(|g| g["_id"].as_str().unwrap_or("").to_string());
        assert_eq!(
            grouped,
            vec![
                json!({"_id": "failed", "count": 1}),
                json!({"_id": "running", "count": 2}),
            ]
        );
    }
}
