//! Composite features computed from several signals joined on date.

use crate::models::signal::{Indicator, Observation, Signal};
use chrono::NaiveDate;

/// Gold spot level at which the implied spread equals [`BASE_SPREAD_BP`].
pub const BASE_GOLD_PRICE: f64 = 2000.0;
/// High-yield spread (bp) implied at [`BASE_GOLD_PRICE`].
pub const BASE_SPREAD_BP: f64 = 400.0;
pub const GOLD_SPREAD_EXPONENT: f64 = 1.5;

/// Spread level (bp) that the gold price implies credit "should" trade at.
pub fn gold_implied_spread(gold_spot: f64) -> f64 {
    BASE_SPREAD_BP * (gold_spot / BASE_GOLD_PRICE).powf(GOLD_SPREAD_EXPONENT)
}

/// Gold-implied spread minus the observed high-yield spread, both in bp.
pub fn divergence_gap(gold_spot: f64, hy_spread_bp: f64) -> f64 {
    gold_implied_spread(gold_spot) - hy_spread_bp
}

/// Inner join on date. Rows missing on either side are dropped.
///
/// Both inputs are ordered, so this is a single merge pass.
pub fn inner_join(left: &Signal, right: &Signal) -> Vec<(NaiveDate, f64, f64)> {
    let (a, b) = (left.observations(), right.observations());
    let (mut i, mut j) = (0, 0);
    let mut rows = Vec::with_capacity(a.len().min(b.len()));

    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                rows.push((a[i].date, a[i].value, b[j].value));
                i += 1;
                j += 1;
            }
        }
    }

    rows
}

/// Combine two signals date-by-date into a derived series in scaled units.
///
/// `combine` receives both values already multiplied by their indicator scale.
/// Non-finite results are skipped.
pub fn joined_series<F>(left: &Signal, right: &Signal, combine: F) -> Vec<Observation>
where
    F: Fn(f64, f64) -> f64,
{
    let (ls, rs) = (left.indicator().scale(), right.indicator().scale());
    inner_join(left, right)
        .into_iter()
        .map(|(date, l, r)| Observation::new(date, combine(l * ls, r * rs)))
        .filter(|o| o.value.is_finite())
        .collect()
}

/// Daily divergence gap from the gold and high-yield series.
pub fn divergence_gap_series(gold: &Signal, hy: &Signal) -> Vec<Observation> {
    debug_assert_eq!(gold.indicator(), Indicator::GoldPrice);
    debug_assert_eq!(hy.indicator(), Indicator::HighYieldSpread);
    joined_series(gold, hy, divergence_gap)
}

pub fn ccc_hy_ratio_series(ccc: &Signal, hy: &Signal) -> Vec<Observation> {
    joined_series(ccc, hy, |ccc_bp, hy_bp| ccc_bp / hy_bp)
}

/// Equal-weight over cap-weight S&P 500, times 100. Below 100 means a narrow rally.
pub fn breadth_ratio_series(equal_weight: &Signal, cap_weight: &Signal) -> Vec<Observation> {
    joined_series(equal_weight, cap_weight, |ew, cw| ew / cw * 100.0)
}
