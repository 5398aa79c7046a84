//! Rule-based regime classifier.

use crate::config::RegimeThresholds;
use crate::models::crisis::CrisisScore;
use crate::models::features::FeatureSnapshot;
use crate::models::regime::RegimeState;
use crate::signals::scoring::CrisisScorer;

/// Maps the crisis score onto a coarse regime label.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedClassifier {
    thresholds: RegimeThresholds,
}

impl RuleBasedClassifier {
    /// Falls back to the default cut-offs when `thresholds` is not monotonic.
    pub fn new(thresholds: RegimeThresholds) -> Self {
        let thresholds = if thresholds.is_monotonic() {
            thresholds
        } else {
            RegimeThresholds::default()
        };
        Self { thresholds }
    }

    pub fn thresholds(&self) -> RegimeThresholds {
        self.thresholds
    }

    /// Classify a snapshot. An empty snapshot scores 0 and maps to Bull.
    pub fn classify(&self, snapshot: &FeatureSnapshot) -> (RegimeState, CrisisScore) {
        let crisis = CrisisScorer::score(snapshot);
        (self.state_for_score(crisis.score), crisis)
    }

    pub fn state_for_score(&self, score: u8) -> RegimeState {
        if score >= self.thresholds.recession_watch {
            RegimeState::RecessionWatch
        } else if score >= self.thresholds.bear {
            RegimeState::Bear
        } else if score >= self.thresholds.neutral {
            RegimeState::Neutral
        } else {
            RegimeState::Bull
        }
    }
}
