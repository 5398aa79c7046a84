//! Typed access to the two persisted documents.

use crate::cache::DocumentStore;
use crate::error::StoreError;
use crate::models::record::CacheRecord;
use crate::signals::confidence::ConfidenceHistory;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub const RESULT_CACHE_KEY: &str = "macro_regime_cache";
pub const CONFIDENCE_HISTORY_KEY: &str = "confidence_history";

/// The latest computed record.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn DocumentStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, record: &CacheRecord) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(record)?;
        self.store.write(RESULT_CACHE_KEY, &body).await
    }

    /// Missing, unreadable and corrupt documents all read as `None`.
    pub async fn load(&self) -> Option<CacheRecord> {
        let body = match self.store.read(RESULT_CACHE_KEY).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                debug!("No regime record cached yet");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read regime record");
                return None;
            }
        };

        match serde_json::from_str(&body) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Cached regime record is corrupt, ignoring");
                None
            }
        }
    }
}

/// Daily confidence values carried between cycles.
#[derive(Clone)]
pub struct ConfidenceStore {
    store: Arc<dyn DocumentStore>,
}

impl ConfidenceStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// A corrupt or missing document starts a fresh history.
    pub async fn load(&self) -> ConfidenceHistory {
        let body = match self.store.read(CONFIDENCE_HISTORY_KEY).await {
            Ok(Some(body)) => body,
            Ok(None) => return ConfidenceHistory::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read confidence history");
                return ConfidenceHistory::new();
            }
        };

        match serde_json::from_str::<BTreeMap<NaiveDate, f64>>(&body) {
            Ok(document) => ConfidenceHistory::from_document(document),
            Err(e) => {
                warn!(error = %e, "Confidence history is corrupt, starting fresh");
                ConfidenceHistory::new()
            }
        }
    }

    pub async fn save(&self, history: &ConfidenceHistory) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&history.to_document())?;
        self.store.write(CONFIDENCE_HISTORY_KEY, &body).await
    }
}
