//! The persisted result bundle read by downstream consumers.

use crate::models::regime::{ClassifierSource, ConfidenceTier, RegimeState, TrendLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub state: RegimeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<ConfidenceTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendLabel>,
    #[serde(default)]
    pub confidence_history: Vec<f64>,
    #[serde(default)]
    pub confidence_sparkline_points: String,
    pub crisis_score: u8,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub classifier: ClassifierSource,
    pub updated_at: DateTime<Utc>,
}
