//! Unit tests for the feature extractor

use chrono::{Duration, NaiveDate};
use regimetrix::features::{change, percentile, FeatureExtractor};
use regimetrix::models::{Composite, FeatureKey, Indicator, Observation, Signal, SignalSet};

fn series(indicator: Indicator, values: &[f64]) -> Signal {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let observations = values
        .iter()
        .enumerate()
        .map(|(i, v)| Observation::new(start + Duration::days(i as i64), *v))
        .collect();
    Signal::new(indicator, observations).unwrap()
}

#[test]
fn test_percent_change() {
    let btc = series(Indicator::BitcoinPrice, &[100.0, 110.0, 90.0]);
    let one_day = change(&btc, 1).unwrap();
    assert!((one_day - (-18.181818)).abs() < 1e-4);
    assert!((change(&btc, 2).unwrap() - (-10.0)).abs() < 1e-9);
}

#[test]
fn test_absolute_change_uses_scaled_units() {
    let hy = series(Indicator::HighYieldSpread, &[3.00, 3.25]);
    // Percent spreads become basis points.
    assert!((change(&hy, 1).unwrap() - 25.0).abs() < 1e-9);
}

#[test]
fn test_change_requires_enough_history() {
    let btc = series(Indicator::BitcoinPrice, &[100.0, 101.0, 102.0]);
    assert!(change(&btc, 3).is_none());
    assert!(change(&btc, 2).is_some());
}

#[test]
fn test_change_with_huge_lookback_is_absent() {
    let btc = series(Indicator::BitcoinPrice, &[100.0, 101.0, 102.0]);
    assert!(btc.lookback(usize::MAX).is_none());
    assert!(btc.lookback(usize::MAX - 1).is_none());
    assert!(change(&btc, usize::MAX).is_none());
}

#[test]
fn test_change_from_zero_is_absent() {
    let btc = series(Indicator::BitcoinPrice, &[0.0, 5.0]);
    assert!(change(&btc, 1).is_none());
}

#[test]
fn test_percentile_of_maximum() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(percentile(5.0, &values), 0.8);
    assert_eq!(percentile(1.0, &values), 0.0);
}

#[test]
fn test_percentile_short_series_is_zero() {
    assert_eq!(percentile(3.0, &[3.0]), 0.0);
    assert_eq!(percentile(3.0, &[]), 0.0);
}

#[test]
fn test_extract_skips_unavailable_lookbacks() {
    let extractor = FeatureExtractor::default();
    let vix = series(Indicator::VixPrice, &[12.0, 13.0, 14.0]);
    let snapshot = extractor.extract(&vix);

    assert_eq!(snapshot.current(Indicator::VixPrice), Some(14.0));
    assert!(snapshot.change(Indicator::VixPrice, 1).is_some());
    assert!(snapshot.change(Indicator::VixPrice, 5).is_none());
    assert!(snapshot.change(Indicator::VixPrice, 20).is_none());
}

#[test]
fn test_snapshot_divergence_gap_scenario() {
    let signals: SignalSet = vec![
        series(Indicator::HighYieldSpread, &[2.76]),
        series(Indicator::GoldPrice, &[414.5]),
    ]
    .into_iter()
    .collect();

    let snapshot = FeatureExtractor::default().snapshot(&signals);

    let hy = snapshot.current(Indicator::HighYieldSpread).unwrap();
    assert!((hy - 276.0).abs() < 1e-9);
    assert_eq!(snapshot.current(Indicator::GoldPrice), Some(4145.0));

    let expected = 400.0 * (4145.0_f64 / 2000.0).powf(1.5) - 276.0;
    let gap = snapshot.composite(Composite::DivergenceGap).unwrap();
    assert!((gap - expected).abs() < 1e-6);
    assert!(gap > 800.0);
}

#[test]
fn test_snapshot_missing_inputs_omit_composites() {
    let signals: SignalSet = vec![series(Indicator::GoldPrice, &[414.5])].into_iter().collect();
    let snapshot = FeatureExtractor::default().snapshot(&signals);

    assert!(snapshot.composite(Composite::GoldImpliedSpread).is_some());
    assert!(snapshot.composite(Composite::DivergenceGap).is_none());
    assert!(snapshot.composite(Composite::CccHyRatio).is_none());
    assert!(snapshot.get(FeatureKey::Current(Indicator::HighYieldSpread)).is_none());
}

#[test]
fn test_breadth_ratio_from_etf_prices() {
    let signals: SignalSet = vec![
        series(Indicator::Sp500EqualWeightPrice, &[160.0, 162.0]),
        series(Indicator::Sp500Price, &[500.0, 540.0]),
    ]
    .into_iter()
    .collect();

    let snapshot = FeatureExtractor::default().snapshot(&signals);
    let ratio = snapshot.composite(Composite::BreadthRatio).unwrap();
    assert!((ratio - 30.0).abs() < 1e-9);
}

#[test]
fn test_published_breadth_ratio_preferred() {
    let signals: SignalSet = vec![
        series(Indicator::MarketBreadthRatio, &[96.5]),
        series(Indicator::Sp500EqualWeightPrice, &[160.0]),
        series(Indicator::Sp500Price, &[500.0]),
    ]
    .into_iter()
    .collect();

    let snapshot = FeatureExtractor::default().snapshot(&signals);
    assert_eq!(snapshot.composite(Composite::BreadthRatio), Some(96.5));
}

#[test]
fn test_empty_signal_set_gives_empty_snapshot() {
    let snapshot = FeatureExtractor::default().snapshot(&SignalSet::new());
    assert!(snapshot.is_empty());
    assert!(snapshot.as_of().is_none());
}
