//! Persistent key-value stores the forecast cache writes through.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::Keyspace;
use tokio::sync::RwLock;
use tokio::task;

use crate::error::StoreError;

/// Blob store keyed by string; values are replaced whole on every `put`
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;
}

fn backend<E: std::fmt::Display>(err: E) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Store backed by a fjall keyspace on local disk
pub struct FjallStore {
    store: Keyspace,
}

impl FjallStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open cache database at {}", path.display()))?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(FjallStore { store: items })
    }
}

#[async_trait]
impl KeyValueStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();

        let value = task::spawn_blocking(move || store.get(key))
            .await
            .map_err(backend)?
            .map_err(backend)?;

        if value.is_none() {
            tracing::debug!("Key not found");
        }
        Ok(value.map(|v| v.to_vec()))
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self, value), fields(bytes = value.len()))]
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();

        task::spawn_blocking(move || store.insert(key, value))
            .await
            .map_err(backend)?
            .map_err(backend)?;
        Ok(())
    }
}

/// In-process store, for tests and single-instance deployments without disk
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let items = self.items.read().await;
        Ok(items.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        items.insert(key.to_string(), value);
        Ok(())
    }
}
