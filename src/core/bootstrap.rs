//! Backend construction from [`EngineConfig`].

use crate::cache::{DocumentStore, FileStore, MemoryStore, RedisStore};
use crate::config::{CacheBackend, EngineConfig, SignalSource};
use crate::db::QuestDatabase;
use crate::error::StoreError;
use crate::services::{JsonSignalStore, SignalStore};
use std::sync::Arc;
use tracing::info;

pub async fn build_signal_store(config: &EngineConfig) -> Result<Arc<dyn SignalStore>, StoreError> {
    match config.signal_source {
        SignalSource::JsonFiles => {
            let dir = config.data_dir.join("signals");
            info!(dir = %dir.display(), "Reading signals from JSON files");
            Ok(Arc::new(JsonSignalStore::new(dir)))
        }
        SignalSource::QuestDb => {
            info!("Initializing QuestDB connection...");
            let db = QuestDatabase::new().await?;
            info!("QuestDB connected");
            Ok(Arc::new(db))
        }
    }
}

pub async fn build_document_store(
    config: &EngineConfig,
) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.cache_backend {
        CacheBackend::File => {
            let dir = config.data_dir.join("cache");
            info!(dir = %dir.display(), "Using file cache");
            Ok(Arc::new(FileStore::new(dir)))
        }
        CacheBackend::Redis => {
            info!("Initializing Redis connection...");
            Ok(Arc::new(RedisStore::new().await?))
        }
        CacheBackend::Memory => {
            info!("Using in-memory cache; records will not outlive the process");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
