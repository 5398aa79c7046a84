//! Monthly multi-signal feature matrix for the statistical classifier.

use crate::models::signal::{Indicator, SignalSet};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Columns used for clustering, in a fixed order.
pub const REGIME_FEATURES: [Indicator; 5] = [
    Indicator::HighYieldSpread,
    Indicator::YieldCurve10y2y,
    Indicator::Nfci,
    Indicator::InitialClaims,
    Indicator::FedFundsRate,
];

/// Rolling window of monthly observations kept for fitting.
pub const HISTORY_MONTHS: usize = 60;
/// Fewer complete months than this and the statistical path is skipped.
pub const MIN_HISTORY_MONTHS: usize = 24;
pub const MIN_FEATURE_COLUMNS: usize = 2;

/// Rows are months (oldest first), columns are indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<Indicator>,
    pub months: Vec<NaiveDate>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Resample each regime feature to its last value per month, align on
    /// month, keep the last [`HISTORY_MONTHS`], forward- then back-fill gaps
    /// and drop columns with no data in the window.
    ///
    /// `None` when fewer than [`MIN_FEATURE_COLUMNS`] columns have data.
    pub fn from_signals(signals: &SignalSet) -> Option<Self> {
        let mut monthly: Vec<(Indicator, BTreeMap<NaiveDate, f64>)> = Vec::new();
        for indicator in REGIME_FEATURES {
            let Some(signal) = signals.get(indicator) else {
                continue;
            };
            let mut by_month = BTreeMap::new();
            for obs in signal.observations() {
                by_month.insert(month_start(obs.date), obs.value);
            }
            if !by_month.is_empty() {
                monthly.push((indicator, by_month));
            }
        }

        let mut months: Vec<NaiveDate> = monthly
            .iter()
            .flat_map(|(_, m)| m.keys().copied())
            .collect();
        months.sort();
        months.dedup();
        if months.len() > HISTORY_MONTHS {
            months.drain(..months.len() - HISTORY_MONTHS);
        }

        let mut columns = Vec::new();
        let mut filled: Vec<Vec<f64>> = Vec::new();
        for (indicator, by_month) in &monthly {
            let raw: Vec<Option<f64>> = months.iter().map(|m| by_month.get(m).copied()).collect();
            if let Some(column) = fill_gaps(&raw) {
                columns.push(*indicator);
                filled.push(column);
            }
        }

        if columns.len() < MIN_FEATURE_COLUMNS {
            return None;
        }

        let rows = (0..months.len())
            .map(|r| filled.iter().map(|col| col[r]).collect())
            .collect();

        Some(Self {
            columns,
            months,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Forward-fill then back-fill. `None` if the column has no value at all.
fn fill_gaps(raw: &[Option<f64>]) -> Option<Vec<f64>> {
    let first = raw.iter().flatten().next().copied()?;
    let mut last = first;
    Some(
        raw.iter()
            .map(|v| {
                if let Some(v) = v {
                    last = *v;
                }
                last
            })
            .collect(),
    )
}
