//! Regime labels, confidence tiers and trend labels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete macro market state, ordered from calm to stressed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum RegimeState {
    #[default]
    Bull,
    Neutral,
    Bear,
    #[serde(rename = "Recession Watch")]
    RecessionWatch,
}

impl RegimeState {
    /// Calm-to-stressed ordering, used for cluster mapping and metrics.
    pub const ORDERED: [RegimeState; 4] = [
        RegimeState::Bull,
        RegimeState::Neutral,
        RegimeState::Bear,
        RegimeState::RecessionWatch,
    ];

    pub fn ordinal(&self) -> i64 {
        match self {
            RegimeState::Bull => 0,
            RegimeState::Neutral => 1,
            RegimeState::Bear => 2,
            RegimeState::RecessionWatch => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RegimeState::Bull => "Bull",
            RegimeState::Neutral => "Neutral",
            RegimeState::Bear => "Bear",
            RegimeState::RecessionWatch => "Recession Watch",
        }
    }
}

impl fmt::Display for RegimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative backing for a regime call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    /// Normalised value recorded in the confidence history.
    pub fn as_score(&self) -> f64 {
        match self {
            ConfidenceTier::High => 0.9,
            ConfidenceTier::Medium => 0.5,
            ConfidenceTier::Low => 0.2,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceTier::Low => "Low",
            ConfidenceTier::Medium => "Medium",
            ConfidenceTier::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLabel {
    Improving,
    Stable,
    Deteriorating,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendLabel::Improving => "improving",
            TrendLabel::Stable => "stable",
            TrendLabel::Deteriorating => "deteriorating",
        };
        f.write_str(label)
    }
}

/// Which classifier produced the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierSource {
    Statistical,
    #[default]
    RuleBased,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeClassification {
    pub state: RegimeState,
    /// Present only on the statistical path.
    pub confidence: Option<ConfidenceTier>,
    pub source: ClassifierSource,
    pub classified_at: DateTime<Utc>,
}

impl RegimeClassification {
    pub fn rule_based(state: RegimeState, classified_at: DateTime<Utc>) -> Self {
        Self {
            state,
            confidence: None,
            source: ClassifierSource::RuleBased,
            classified_at,
        }
    }

    pub fn statistical(
        state: RegimeState,
        confidence: ConfidenceTier,
        classified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            state,
            confidence: Some(confidence),
            source: ClassifierSource::Statistical,
            classified_at,
        }
    }
}
