//! Unit tests for the confidence history tracker

use chrono::{Duration, NaiveDate};
use regimetrix::models::TrendLabel;
use regimetrix::signals::confidence::{
    compute_trend, sparkline, sparkline_points, ConfidenceHistory, MAX_HISTORY_DAYS,
    TREND_DELTA_THRESHOLD,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap() + Duration::days(offset)
}

#[test]
fn test_short_history_is_stable() {
    assert_eq!(compute_trend(&[]), TrendLabel::Stable);
    assert_eq!(compute_trend(&[0.9]), TrendLabel::Stable);
    assert_eq!(compute_trend(&[0.9, 0.2, 0.2]), TrendLabel::Stable);
}

#[test]
fn test_deteriorating_scenario() {
    let values = [0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.9, 0.2, 0.2, 0.2];
    assert_eq!(compute_trend(&values), TrendLabel::Deteriorating);
}

#[test]
fn test_improving() {
    let values = [0.2, 0.2, 0.2, 0.2, 0.9, 0.9, 0.9];
    assert_eq!(compute_trend(&values), TrendLabel::Improving);
}

#[test]
fn test_trend_threshold_boundary() {
    // Baseline covers the last 10 points only.
    let mut values = vec![0.0; 4];
    values.extend([0.5; 10]);
    assert_eq!(compute_trend(&values), TrendLabel::Stable);

    // delta = 0.028: recent 0.54, baseline (7 * 0.5 + 3 * 0.54) / 10 = 0.512
    let mut small = vec![0.5; 7];
    small.extend([0.54; 3]);
    let delta = 0.54 - 0.512;
    assert!(delta < TREND_DELTA_THRESHOLD);
    assert_eq!(compute_trend(&small), TrendLabel::Stable);
}

#[test]
fn test_sparkline_needs_three_points() {
    assert!(sparkline(&[]).is_empty());
    assert!(sparkline(&[0.5, 0.9]).is_empty());
    assert_eq!(sparkline_points(&[0.5, 0.9]), "");
}

#[test]
fn test_sparkline_coordinates() {
    let points = sparkline(&[0.9, 0.5, 0.2]);
    assert_eq!(points, vec![(0.0, 3.2), (50.0, 16.0), (100.0, 25.6)]);
    assert_eq!(sparkline_points(&[0.9, 0.5, 0.2]), "0.0,3.2 50.0,16.0 100.0,25.6");
}

#[test]
fn test_sparkline_rounds_to_one_decimal() {
    let points = sparkline(&[1.0, 0.0, 0.0, 1.0]);
    assert_eq!(points[1], (33.3, 32.0));
    assert_eq!(points[2], (66.7, 32.0));
    assert_eq!(points[3], (100.0, 0.0));
}

#[test]
fn test_record_same_day_overwrites() {
    let mut history = ConfidenceHistory::new();
    history.record(day(0), 0.9);
    history.record(day(1), 0.5);
    history.record(day(1), 0.2);

    assert_eq!(history.len(), 2);
    assert_eq!(history.values(), vec![0.9, 0.2]);
}

#[test]
fn test_history_is_bounded() {
    let mut history = ConfidenceHistory::new();
    for i in 0..40 {
        history.record(day(i), 0.5);
        assert!(history.len() <= MAX_HISTORY_DAYS);
    }
    assert_eq!(history.len(), MAX_HISTORY_DAYS);
    assert_eq!(history.entries()[0].date, day(40 - MAX_HISTORY_DAYS as i64));
    assert_eq!(history.entries().last().unwrap().date, day(39));
}

#[test]
fn test_record_keeps_dates_ordered() {
    let mut history = ConfidenceHistory::new();
    history.record(day(5), 0.5);
    history.record(day(1), 0.9);
    history.record(day(3), 0.2);

    let dates: Vec<NaiveDate> = history.entries().iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![day(1), day(3), day(5)]);
}

#[test]
fn test_record_clamps_and_skips_invalid() {
    let mut history = ConfidenceHistory::new();
    history.record(day(0), 1.7);
    history.record(day(1), -0.3);
    history.record(day(2), f64::NAN);

    assert_eq!(history.values(), vec![1.0, 0.0]);
}

#[test]
fn test_document_drops_excess_entries() {
    let document = (0..20).map(|i| (day(i), 0.9)).collect();
    let history = ConfidenceHistory::from_document(document);

    assert_eq!(history.len(), MAX_HISTORY_DAYS);
    assert_eq!(history.to_document().len(), MAX_HISTORY_DAYS);
    assert_eq!(history.trend(), TrendLabel::Stable);
}
