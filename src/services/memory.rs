//! In-memory signal store, used for tests and ad-hoc runs.

use crate::error::StoreError;
use crate::models::signal::{Indicator, Signal};
use crate::services::signal_store::SignalStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemorySignalStore {
    signals: RwLock<HashMap<Indicator, Signal>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signals(signals: impl IntoIterator<Item = Signal>) -> Self {
        let map = signals.into_iter().map(|s| (s.indicator(), s)).collect();
        Self {
            signals: RwLock::new(map),
        }
    }

    pub async fn insert(&self, signal: Signal) {
        self.signals.write().await.insert(signal.indicator(), signal);
    }

    pub async fn remove(&self, indicator: Indicator) {
        self.signals.write().await.remove(&indicator);
    }

    pub async fn clear(&self) {
        self.signals.write().await.clear();
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn load(&self, indicator: Indicator) -> Result<Option<Signal>, StoreError> {
        Ok(self.signals.read().await.get(&indicator).cloned())
    }
}
