//! Confidence history, trend label and sparkline coordinates.
//!
//! The history is the only state carried between update cycles: at most
//! one value per calendar date, oldest first, capped at
//! [`MAX_HISTORY_DAYS`] entries.

use crate::common::math;
use crate::models::regime::TrendLabel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_HISTORY_DAYS: usize = 14;

/// Recent-vs-baseline mean difference that counts as a trend.
pub const TREND_DELTA_THRESHOLD: f64 = 0.05;
pub const MIN_TREND_POINTS: usize = 4;
pub const RECENT_WINDOW: usize = 3;
pub const BASELINE_WINDOW: usize = 10;

pub const MIN_SPARKLINE_POINTS: usize = 3;
pub const SPARKLINE_WIDTH: f64 = 100.0;
pub const SPARKLINE_HEIGHT: f64 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceEntry {
    pub date: NaiveDate,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfidenceHistory {
    entries: Vec<ConfidenceEntry>,
}

impl ConfidenceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted `date -> confidence` pairs, enforcing the invariants.
    pub fn from_document(document: BTreeMap<NaiveDate, f64>) -> Self {
        let mut history = Self::new();
        for (date, confidence) in document {
            history.record(date, confidence);
        }
        history
    }

    pub fn to_document(&self) -> BTreeMap<NaiveDate, f64> {
        self.entries.iter().map(|e| (e.date, e.confidence)).collect()
    }

    /// Add or overwrite the value for `date`, then trim to the newest
    /// [`MAX_HISTORY_DAYS`] entries. Non-finite values are ignored and the
    /// rest are clamped to [0, 1].
    pub fn record(&mut self, date: NaiveDate, confidence: f64) {
        if !confidence.is_finite() {
            return;
        }
        let confidence = confidence.clamp(0.0, 1.0);

        match self.entries.binary_search_by(|e| e.date.cmp(&date)) {
            Ok(idx) => self.entries[idx].confidence = confidence,
            Err(idx) => self.entries.insert(idx, ConfidenceEntry { date, confidence }),
        }

        if self.entries.len() > MAX_HISTORY_DAYS {
            let excess = self.entries.len() - MAX_HISTORY_DAYS;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[ConfidenceEntry] {
        &self.entries
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.confidence).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn trend(&self) -> TrendLabel {
        compute_trend(&self.values())
    }

    pub fn sparkline(&self) -> Vec<(f64, f64)> {
        sparkline(&self.values())
    }

    pub fn sparkline_points(&self) -> String {
        sparkline_points(&self.values())
    }
}

/// Mean of the last 3 values against the mean of the last (up to) 10.
///
/// Fewer than [`MIN_TREND_POINTS`] values is always `Stable`.
pub fn compute_trend(values: &[f64]) -> TrendLabel {
    if values.len() < MIN_TREND_POINTS {
        return TrendLabel::Stable;
    }

    let recent = &values[values.len() - RECENT_WINDOW..];
    let baseline = &values[values.len().saturating_sub(BASELINE_WINDOW)..];

    let (Some(avg_recent), Some(avg_baseline)) = (math::mean(recent), math::mean(baseline)) else {
        return TrendLabel::Stable;
    };

    let delta = avg_recent - avg_baseline;
    if delta > TREND_DELTA_THRESHOLD {
        TrendLabel::Improving
    } else if delta < -TREND_DELTA_THRESHOLD {
        TrendLabel::Deteriorating
    } else {
        TrendLabel::Stable
    }
}

/// Points on a 100 x 32 canvas, oldest at x = 0, high confidence near y = 0.
/// Both coordinates are rounded to one decimal. Empty below three values.
pub fn sparkline(values: &[f64]) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < MIN_SPARKLINE_POINTS {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let x = (i as f64 / (n - 1) as f64) * SPARKLINE_WIDTH;
            let y = SPARKLINE_HEIGHT - (c * SPARKLINE_HEIGHT);
            (math::round1(x), math::round1(y))
        })
        .collect()
}

/// Space-separated `"x.x,y.y"` pairs, or an empty string.
pub fn sparkline_points(values: &[f64]) -> String {
    sparkline(values)
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}
