//! Feature extractor: latest value, N-period change, percentile rank and composites.

use crate::common::math;
use crate::features::composite;
use crate::models::features::{Composite, FeatureKey, FeatureSnapshot};
use crate::models::signal::{ChangeMode, Indicator, Observation, Signal, SignalSet};
use tracing::debug;

/// Default trading-day lookbacks for `change_Nd` features.
pub const LOOKBACKS: [usize; 3] = [1, 5, 20];

/// N-period change of a signal.
///
/// Needs at least `periods + 1` points. Percent-mode signals return
/// `(latest / past - 1) * 100`; absolute-mode signals return the scaled
/// difference (spreads in bp). `None` when history is too short or the
/// base value is zero.
pub fn change(signal: &Signal, periods: usize) -> Option<f64> {
    let latest = signal.latest()?;
    let past = signal.lookback(periods)?;
    let indicator = signal.indicator();

    let value = match indicator.change_mode() {
        ChangeMode::Percent => {
            if past.value == 0.0 {
                return None;
            }
            (latest.value / past.value - 1.0) * 100.0
        }
        ChangeMode::Absolute => (latest.value - past.value) * indicator.scale(),
    };

    value.is_finite().then_some(value)
}

/// Fraction of historical values strictly below `value`, in [0, 1].
pub fn percentile(value: f64, series: &[f64]) -> f64 {
    math::percentile_rank(value, series)
}

/// Builds [`FeatureSnapshot`]s. Pure: no I/O, no state.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    lookbacks: Vec<usize>,
}

impl FeatureExtractor {
    pub fn new(lookbacks: &[usize]) -> Self {
        Self {
            lookbacks: lookbacks.to_vec(),
        }
    }

    /// Features for one signal: current (scaled), changes, percentile.
    pub fn extract(&self, signal: &Signal) -> FeatureSnapshot {
        let mut snapshot = FeatureSnapshot::new();
        self.extract_into(signal, &mut snapshot);
        snapshot
    }

    fn extract_into(&self, signal: &Signal, snapshot: &mut FeatureSnapshot) {
        let Some(latest) = signal.latest() else {
            return;
        };
        let indicator = signal.indicator();

        snapshot.observe_date(latest.date);
        snapshot.insert(
            FeatureKey::Current(indicator),
            latest.value * indicator.scale(),
        );

        for &periods in &self.lookbacks {
            if let Some(value) = change(signal, periods) {
                snapshot.insert(FeatureKey::Change(indicator, periods), value);
            }
        }

        snapshot.insert(
            FeatureKey::Percentile(indicator),
            percentile(latest.value, &signal.values()),
        );
    }

    /// Full snapshot over every available signal plus derived composites.
    ///
    /// Missing inputs simply leave the dependent features out.
    pub fn snapshot(&self, signals: &SignalSet) -> FeatureSnapshot {
        let mut snapshot = FeatureSnapshot::new();

        for signal in signals.iter() {
            self.extract_into(signal, &mut snapshot);
        }

        if let Some(gold) = snapshot.current(Indicator::GoldPrice) {
            snapshot.insert(
                FeatureKey::Composite(Composite::GoldImpliedSpread),
                composite::gold_implied_spread(gold),
            );
        }

        if let (Some(gold), Some(hy)) = (
            signals.get(Indicator::GoldPrice),
            signals.get(Indicator::HighYieldSpread),
        ) {
            let series = composite::divergence_gap_series(gold, hy);
            insert_series(&mut snapshot, Composite::DivergenceGap, &series, true);
        }

        if let (Some(ccc), Some(hy)) = (
            signals.get(Indicator::CccSpread),
            signals.get(Indicator::HighYieldSpread),
        ) {
            let series = composite::ccc_hy_ratio_series(ccc, hy);
            insert_series(&mut snapshot, Composite::CccHyRatio, &series, false);
        }

        // A published breadth ratio wins over the one rebuilt from ETF prices.
        if let Some(breadth) = snapshot.current(Indicator::MarketBreadthRatio) {
            snapshot.insert(FeatureKey::Composite(Composite::BreadthRatio), breadth);
        } else if let (Some(ew), Some(cw)) = (
            signals.get(Indicator::Sp500EqualWeightPrice),
            signals.get(Indicator::Sp500Price),
        ) {
            let series = composite::breadth_ratio_series(ew, cw);
            insert_series(&mut snapshot, Composite::BreadthRatio, &series, false);
        }

        debug!(
            signals = signals.len(),
            features = snapshot.len(),
            "FeatureExtractor: built snapshot with {} features from {} signals",
            snapshot.len(),
            signals.len()
        );

        snapshot
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(&LOOKBACKS)
    }
}

fn insert_series(
    snapshot: &mut FeatureSnapshot,
    composite: Composite,
    series: &[Observation],
    with_percentile: bool,
) {
    let Some(last) = series.last() else {
        return;
    };
    snapshot.insert(FeatureKey::Composite(composite), last.value);
    if with_percentile {
        let values: Vec<f64> = series.iter().map(|o| o.value).collect();
        snapshot.insert(
            FeatureKey::CompositePercentile(composite),
            percentile(last.value, &values),
        );
    }
}
