//! Redis documents. A single `SET` replaces the whole value.

use crate::cache::DocumentStore;
use crate::config;
use crate::error::StoreError;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

pub const DEFAULT_KEY_PREFIX: &str = "regimetrix";

pub struct RedisStore {
    manager: ConnectionManager,
    prefix: String,
}

impl RedisStore {
    pub async fn new() -> Result<Self, StoreError> {
        Self::connect(&config::get_redis_url()).await
    }

    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;
        tracing::info!(url = %redis_url, "Connected to Redis");
        Ok(Self {
            manager,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(self.namespaced(key)).await?;
        Ok(value)
    }

    async fn write(&self, key: &str, body: &str) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(self.namespaced(key), body).await?;
        Ok(())
    }
}
