//! In-memory documents for tests and single-process runs.

use crate::cache::DocumentStore;
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, body: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .insert(key.to_string(), body.to_string());
        Ok(())
    }
}
