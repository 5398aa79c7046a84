//! Integration tests for the regime engine
//!
//! Covers the read/write API contract: records only replace each other whole,
//! failures leave the previous record in place, and confidence history is
//! carried between cycles.

use super::test_utils::{monthly_regime_signals, ramp, stressed_daily_signals};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use regimetrix::cache::{DocumentStore, FileStore, MemoryStore, RESULT_CACHE_KEY};
use regimetrix::error::{EngineError, StoreError};
use regimetrix::metrics::Metrics;
use regimetrix::models::{ClassifierSource, ConfidenceTier, Indicator, RegimeState, TrendLabel};
use regimetrix::services::{JsonSignalStore, MemorySignalStore};
use regimetrix::signals::engine::RegimeEngine;
use std::sync::Arc;

/// Reads succeed, writes always fail.
struct ReadOnlyStore;

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _body: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

fn memory_engine(signals: MemorySignalStore) -> (RegimeEngine, Arc<MemorySignalStore>) {
    let signals = Arc::new(signals);
    let engine = RegimeEngine::new(signals.clone(), Arc::new(MemoryStore::new()));
    (engine, signals)
}

#[tokio::test]
async fn no_signals_returns_none_and_writes_nothing() {
    let (engine, _) = memory_engine(MemorySignalStore::new());

    assert!(engine.update_regime().await.is_none());
    assert!(engine.get_regime().await.is_none());
    assert!(matches!(
        engine.run_cycle(Utc::now()).await,
        Err(EngineError::NoUsableSignals)
    ));
}

#[tokio::test]
async fn rule_based_record_when_history_is_short() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(stressed_daily_signals()));

    let record = engine.update_regime().await.expect("record");

    // 10 (HY < 300bp) + 20 (gold > 4000) + 25 (divergence > 800bp) + 5 (complacency)
    assert_eq!(record.crisis_score, 60);
    assert_eq!(record.state, RegimeState::Bear);
    assert_eq!(record.classifier, ClassifierSource::RuleBased);
    assert_eq!(record.confidence, None);
    assert_eq!(record.trend, None);
    assert!(record.confidence_history.is_empty());
    assert_eq!(record.confidence_sparkline_points, "");

    assert_eq!(record.warnings.len(), 4);
    assert!(record.warnings[2].contains("EXTREME divergence gap"));
    assert!(record.warnings[3].contains("complacency despite other warnings"));

    assert_eq!(engine.get_regime().await, Some(record));
}

#[tokio::test]
async fn liquidity_warning_end_to_end() {
    let signals = vec![
        ramp(Indicator::BitcoinPrice, 100.0, 88.0, 21),
        ramp(Indicator::GoldPrice, 440.0, 413.6, 21),
    ];
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(signals));

    let record = engine.update_regime().await.expect("record");
    assert!(record.warnings.iter().any(|w| w.contains("Bitcoin weak")));
    assert!(record
        .warnings
        .iter()
        .any(|w| w.contains("liquidity tight as safe havens sell off too")));
}

#[tokio::test]
async fn record_and_history_share_the_cycle_timestamp() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(monthly_regime_signals(40)));
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 23, 59, 30).unwrap();

    let record = engine.run_cycle(now).await.unwrap();
    assert_eq!(record.updated_at, now);
    assert_eq!(engine.get_regime().await.unwrap().updated_at, now);

    // A second cycle at the same stamp lands on the same history date.
    let again = engine.run_cycle(now).await.unwrap();
    assert_eq!(again.updated_at, now);
    assert_eq!(again.confidence_history, vec![0.9]);
}

#[tokio::test]
async fn rule_based_record_uses_the_cycle_timestamp() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(stressed_daily_signals()));
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 22, 30, 0).unwrap();

    let record = engine.run_cycle(now).await.unwrap();
    assert_eq!(record.classifier, ClassifierSource::RuleBased);
    assert_eq!(record.updated_at, now);
}

#[tokio::test]
async fn statistical_path_records_confidence() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(monthly_regime_signals(40)));

    let record = engine.update_regime().await.expect("record");

    assert_eq!(record.classifier, ClassifierSource::Statistical);
    assert_eq!(record.state, RegimeState::RecessionWatch);
    assert_eq!(record.confidence, Some(ConfidenceTier::High));
    assert_eq!(record.confidence_history, vec![0.9]);
    // One point is not enough for a trend or a sparkline.
    assert_eq!(record.trend, None);
    assert_eq!(record.confidence_sparkline_points, "");
}

#[tokio::test]
async fn history_accumulates_across_days() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(monthly_regime_signals(40)));
    let first_day = Utc.with_ymd_and_hms(2025, 3, 3, 22, 30, 0).unwrap();

    let mut last = None;
    for day in 0..5 {
        last = Some(engine.run_cycle(first_day + Duration::days(day)).await.unwrap());
    }
    let record = last.unwrap();

    assert_eq!(record.confidence_history.len(), 5);
    assert_eq!(record.trend, Some(TrendLabel::Stable));
    assert_eq!(
        record.confidence_sparkline_points,
        "0.0,3.2 25.0,3.2 50.0,3.2 75.0,3.2 100.0,3.2"
    );
}

#[tokio::test]
async fn rerun_on_same_day_does_not_grow_history() {
    let (engine, _) = memory_engine(MemorySignalStore::with_signals(monthly_regime_signals(40)));
    let now = Utc.with_ymd_and_hms(2025, 3, 3, 22, 30, 0).unwrap();

    engine.run_cycle(now).await.unwrap();
    let record = engine.run_cycle(now + Duration::hours(1)).await.unwrap();

    assert_eq!(record.confidence_history.len(), 1);
}

#[tokio::test]
async fn failed_cycle_keeps_previous_record() {
    let (engine, signals) =
        memory_engine(MemorySignalStore::with_signals(stressed_daily_signals()));

    let first = engine.update_regime().await.expect("record");
    signals.clear().await;

    assert!(engine.update_regime().await.is_none());
    assert_eq!(engine.get_regime().await, Some(first));
}

#[tokio::test]
async fn cache_write_failure_returns_none() {
    let engine = RegimeEngine::new(
        Arc::new(MemorySignalStore::with_signals(stressed_daily_signals())),
        Arc::new(ReadOnlyStore),
    );

    assert!(matches!(
        engine.run_cycle(Utc::now()).await,
        Err(EngineError::Cache(_))
    ));
    assert!(engine.update_regime().await.is_none());
}

#[tokio::test]
async fn metrics_track_updates_and_failures() {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    let signals = Arc::new(MemorySignalStore::with_signals(stressed_daily_signals()));
    let engine = RegimeEngine::new(signals.clone(), Arc::new(MemoryStore::new()))
        .with_metrics(metrics.clone());

    engine.update_regime().await.expect("record");
    assert_eq!(metrics.regime_updates_total.get(), 1);
    assert_eq!(metrics.crisis_score.get(), 60);
    assert_eq!(metrics.regime_state.get(), RegimeState::Bear.ordinal());
    assert_eq!(metrics.signals_available.get(), 3);

    signals.clear().await;
    assert!(engine.update_regime().await.is_none());
    assert_eq!(metrics.regime_update_failures_total.get(), 1);

    let text = metrics.export().unwrap();
    assert!(text.contains("regime_updates_total 1"));
}

#[tokio::test]
async fn file_backends_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let signal_store = JsonSignalStore::new(dir.path().join("signals"));
    for signal in stressed_daily_signals() {
        signal_store.store(&signal).await.unwrap();
    }

    let documents = Arc::new(FileStore::new(dir.path().join("cache")));
    let engine = RegimeEngine::new(Arc::new(signal_store), documents.clone());

    let record = engine.update_regime().await.expect("record");
    assert!(documents.path_for(RESULT_CACHE_KEY).exists());

    // A fresh engine over the same directory reads the same record.
    let reader = RegimeEngine::new(
        Arc::new(JsonSignalStore::new(dir.path().join("signals"))),
        Arc::new(FileStore::new(dir.path().join("cache"))),
    );
    assert_eq!(reader.get_regime().await, Some(record));

    std::fs::write(documents.path_for(RESULT_CACHE_KEY), "{ truncated").unwrap();
    assert!(reader.get_regime().await.is_none());
}
