//! Unit tests for the JSON signal store

use chrono::NaiveDate;
use regimetrix::error::StoreError;
use regimetrix::models::{Indicator, Observation, Signal};
use regimetrix::services::{load_all, JsonSignalStore, MemorySignalStore, SignalStore};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

#[tokio::test]
async fn test_store_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSignalStore::new(dir.path());
    let signal = Signal::new(
        Indicator::VixPrice,
        vec![Observation::new(date(2), 14.5), Observation::new(date(3), 15.0)],
    )
    .unwrap();

    store.store(&signal).await.unwrap();
    assert!(store.path_for(Indicator::VixPrice).ends_with("vix_price.json"));
    assert_eq!(store.load(Indicator::VixPrice).await.unwrap(), Some(signal));
}

#[tokio::test]
async fn test_missing_file_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSignalStore::new(dir.path());
    assert!(store.load(Indicator::GoldPrice).await.unwrap().is_none());
}

#[tokio::test]
async fn test_unordered_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSignalStore::new(dir.path());
    std::fs::write(
        store.path_for(Indicator::GoldPrice),
        r#"[{"date": "2025-01-03", "value": 410.0}, {"date": "2025-01-02", "value": 405.0}]"#,
    )
    .unwrap();

    assert!(matches!(
        store.load(Indicator::GoldPrice).await,
        Err(StoreError::Signal(_))
    ));
}

#[tokio::test]
async fn test_load_all_skips_broken_signals() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonSignalStore::new(dir.path());
    std::fs::write(store.path_for(Indicator::GoldPrice), "{ broken").unwrap();
    std::fs::write(
        store.path_for(Indicator::HighYieldSpread),
        r#"[{"date": "2025-01-02", "value": 2.76}]"#,
    )
    .unwrap();
    std::fs::write(store.path_for(Indicator::VixPrice), "[]").unwrap();

    let signals = load_all(&store).await;
    assert_eq!(signals.len(), 1);
    assert!(signals.contains(Indicator::HighYieldSpread));
}

#[tokio::test]
async fn test_memory_store() {
    let signal = Signal::new(Indicator::Nfci, vec![Observation::new(date(2), -0.4)]).unwrap();
    let store = MemorySignalStore::with_signals(vec![signal.clone()]);
    assert_eq!(store.load(Indicator::Nfci).await.unwrap(), Some(signal));

    store.remove(Indicator::Nfci).await;
    assert!(store.load(Indicator::Nfci).await.unwrap().is_none());
}
