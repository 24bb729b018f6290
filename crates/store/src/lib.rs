//! Storage backends for ContentScout: document stores (in-memory, SQLite)
//! and caches (in-memory, Redis), plus the [`AppContext`] that owns the
//! connected handles and gets passed through the pipeline explicitly —
//! there are no global clients.

pub mod cache_memory;
pub mod memory;
pub mod query;
pub mod redis;
pub mod sqlite;

pub use cache_memory::MemoryCacheStore;
pub use memory::MemoryDocumentStore;
pub use redis::RedisCacheStore;
pub use sqlite::SqliteDocumentStore;

use contentscout_config::AppConfig;
use contentscout_core::error::{Error, Result};
use contentscout_core::store::{CacheStore, DocumentStore};
use std::sync::Arc;

/// The connected storage handles the orchestrator and gateway work with.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn DocumentStore>,
    pub cache: Arc<dyn CacheStore>,
}

impl AppContext {
    /// Build the configured backends and connect both.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend.as_str() {
            "sqlite" => Arc::new(SqliteDocumentStore::new(config.store.sqlite_path.clone())),
            _ => Arc::new(MemoryDocumentStore::new()),
        };
        let cache: Arc<dyn CacheStore> = match config.cache.backend.as_str() {
            "redis" => Arc::new(RedisCacheStore::new(config.cache.redis_url.clone())),
            _ => Arc::new(MemoryCacheStore::new()),
        };
        store.connect().await.map_err(Error::Store)?;
        cache.connect().await.map_err(Error::Cache)?;
        tracing::info!(
            store = %config.store.backend,
            cache = %config.cache.backend,
            "storage context connected"
        );
        Ok(Self { store, cache })
    }

    /// Fully in-memory context, already connected. For tests and dev runs.
    pub async fn in_memory() -> Result<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
        store.connect().await.map_err(Error::Store)?;
        cache.connect().await.map_err(Error::Cache)?;
        Ok(Self { store, cache })
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.store.disconnect().await.map_err(Error::Store)?;
        self.cache.disconnect().await.map_err(Error::Cache)?;
        Ok(())
    }

    /// Both backends answering.
    pub async fn health(&self) -> (bool, bool) {
        let store_ok = self.store.health_check().await.unwrap_or(false);
        let cache_ok = self.cache.health_check().await.unwrap_or(false);
        (store_ok, cache_ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn in_memory_context_is_ready_to_use() {
        let ctx = AppContext::in_memory().await.unwrap();
        ctx.store
            .insert_one("campaigns", json!({"id": "x"}))
            .await
            .unwrap();
        ctx.cache.set("k", &json!(1), None).await.unwrap();
        assert_eq!(ctx.health().await, (true, true));
        ctx.shutdown().await.unwrap();
        assert_eq!(ctx.health().await, (false, false));
    }

    #[tokio::test]
    async fn connect_honors_the_configured_backends() {
        let mut config = AppConfig::default();
        config.store.backend = "memory".into();
        config.cache.backend = "memory".into();
        let ctx = AppContext::connect(&config).await.unwrap();
        assert_eq!(ctx.health().await, (true, true));
    }
}
