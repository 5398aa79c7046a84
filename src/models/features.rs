//! Point-in-time feature snapshot derived from raw signals.

use crate::models::signal::Indicator;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// Named composites computed from two or more signals joined on date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Composite {
    /// Spread level implied by the gold price.
    GoldImpliedSpread,
    /// Gold-implied spread minus the observed high-yield spread, in bp.
    DivergenceGap,
    CccHyRatio,
    /// Equal-weight vs cap-weight S&P ratio, times 100.
    BreadthRatio,
}

impl Composite {
    pub fn key(&self) -> &'static str {
        match self {
            Composite::GoldImpliedSpread => "gold_implied_spread",
            Composite::DivergenceGap => "divergence_gap",
            Composite::CccHyRatio => "ccc_hy_ratio",
            Composite::BreadthRatio => "breadth_ratio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKey {
    Current(Indicator),
    Change(Indicator, usize),
    Percentile(Indicator),
    Composite(Composite),
    CompositePercentile(Composite),
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Current(i) => write!(f, "{}.current", i.key()),
            FeatureKey::Change(i, n) => write!(f, "{}.change_{}d", i.key(), n),
            FeatureKey::Percentile(i) => write!(f, "{}.percentile", i.key()),
            FeatureKey::Composite(c) => f.write_str(c.key()),
            FeatureKey::CompositePercentile(c) => write!(f, "{}.percentile", c.key()),
        }
    }
}

/// Mapping from feature key to value. Absent keys mean "not computable".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSnapshot {
    values: BTreeMap<FeatureKey, f64>,
    as_of: Option<NaiveDate>,
}

impl FeatureSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, value: f64) {
        if value.is_finite() {
            self.values.insert(key, value);
        }
    }

    pub fn with(mut self, key: FeatureKey, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn current(&self, indicator: Indicator) -> Option<f64> {
        self.get(FeatureKey::Current(indicator))
    }

    pub fn change(&self, indicator: Indicator, periods: usize) -> Option<f64> {
        self.get(FeatureKey::Change(indicator, periods))
    }

    pub fn percentile(&self, indicator: Indicator) -> Option<f64> {
        self.get(FeatureKey::Percentile(indicator))
    }

    pub fn composite(&self, composite: Composite) -> Option<f64> {
        self.get(FeatureKey::Composite(composite))
    }

    /// Latest observation date across contributing signals.
    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    pub fn observe_date(&mut self, date: NaiveDate) {
        self.as_of = Some(self.as_of.map_or(date, |d| d.max(date)));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
