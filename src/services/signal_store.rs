//! Signal store interface for the time-series input boundary.

use crate::error::StoreError;
use crate::models::signal::{Indicator, SignalSet};
use crate::models::Signal;
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Load the full history for one indicator.
    ///
    /// `Ok(None)` means the signal is simply not available.
    async fn load(&self, indicator: Indicator) -> Result<Option<Signal>, StoreError>;
}

/// Load every supported indicator. Failures are logged and treated as absent.
pub async fn load_all(store: &dyn SignalStore) -> SignalSet {
    let mut signals = SignalSet::new();

    for indicator in Indicator::ALL {
        match store.load(indicator).await {
            Ok(Some(signal)) if !signal.is_empty() => {
                debug!(indicator = %indicator, points = signal.len(), "Loaded signal");
                signals.insert(signal);
            }
            Ok(_) => {
                debug!(indicator = %indicator, "Signal not available");
            }
            Err(e) => {
                warn!(indicator = %indicator, error = %e, "Failed to load signal, treating as missing");
            }
        }
    }

    signals
}
