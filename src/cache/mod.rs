//! Persistence for the result record and the confidence history.
//!
//! Backends store whole documents under a key and must replace them
//! atomically: a reader sees either the previous document or the new one.

pub mod file;
pub mod memory;
pub mod redis_store;
pub mod result;

pub use file::*;
pub use memory::*;
pub use redis_store::*;
pub use result::*;

use crate::error::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// `Ok(None)` when nothing has been written under `key` yet.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the document under `key` in a single step.
    async fn write(&self, key: &str, body: &str) -> Result<(), StoreError>;
}
