//! Signals stored as `<data_dir>/<indicator>.json` arrays of `{date, value}`.

use crate::error::StoreError;
use crate::models::signal::{Indicator, Observation, Signal};
use crate::services::signal_store::SignalStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct JsonSignalStore {
    dir: PathBuf,
}

impl JsonSignalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, indicator: Indicator) -> PathBuf {
        self.dir.join(format!("{}.json", indicator.key()))
    }

    /// Write a series in the format [`load`](SignalStore::load) reads.
    pub async fn store(&self, signal: &Signal) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let body = serde_json::to_vec_pretty(signal.observations())?;
        tokio::fs::write(self.path_for(signal.indicator()), body).await?;
        Ok(())
    }
}

#[async_trait]
impl SignalStore for JsonSignalStore {
    async fn load(&self, indicator: Indicator) -> Result<Option<Signal>, StoreError> {
        let path = self.path_for(indicator);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let observations: Vec<Observation> = serde_json::from_slice(&body)?;
        Ok(Some(Signal::new(indicator, observations)?))
    }
}
