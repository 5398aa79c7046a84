//! Regime update cycle: load signals, classify, score, track confidence, persist.

use crate::cache::{ConfidenceStore, DocumentStore, ResultCache};
use crate::config::RegimeThresholds;
use crate::error::EngineError;
use crate::features::{FeatureExtractor, FeatureMatrix};
use crate::metrics::Metrics;
use crate::models::record::CacheRecord;
use crate::models::regime::RegimeClassification;
use crate::services::signal_store::{self, SignalStore};
use crate::signals::classifier::RuleBasedClassifier;
use crate::signals::clustering::{self, ClusterClassifier, KMeans};
use crate::signals::confidence::MIN_TREND_POINTS;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct RegimeEngine {
    store: Arc<dyn SignalStore>,
    results: ResultCache,
    history: ConfidenceStore,
    clusterer: Box<dyn ClusterClassifier>,
    classifier: RuleBasedClassifier,
    extractor: FeatureExtractor,
    metrics: Option<Arc<Metrics>>,
}

impl RegimeEngine {
    /// Both the result record and the confidence history live in `documents`.
    pub fn new(store: Arc<dyn SignalStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            results: ResultCache::new(documents.clone()),
            history: ConfidenceStore::new(documents),
            clusterer: Box::new(KMeans::default()),
            classifier: RuleBasedClassifier::default(),
            extractor: FeatureExtractor::default(),
            metrics: None,
        }
    }

    pub fn with_clusterer(mut self, clusterer: Box<dyn ClusterClassifier>) -> Self {
        self.clusterer = clusterer;
        self
    }

    pub fn with_thresholds(mut self, thresholds: RegimeThresholds) -> Self {
        self.classifier = RuleBasedClassifier::new(thresholds);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Latest persisted record. Never recomputes.
    pub async fn get_regime(&self) -> Option<CacheRecord> {
        self.results.load().await
    }

    /// Run one cycle. `None` leaves the previous record in place.
    pub async fn update_regime(&self) -> Option<CacheRecord> {
        let started = Instant::now();
        let outcome = self.run_cycle(Utc::now()).await;

        if let Some(ref metrics) = self.metrics {
            metrics
                .regime_update_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        match outcome {
            Ok(record) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.regime_updates_total.inc();
                    metrics.crisis_score.set(i64::from(record.crisis_score));
                    metrics.regime_state.set(record.state.ordinal());
                }
                Some(record)
            }
            Err(e) => {
                if let Some(ref metrics) = self.metrics {
                    metrics.regime_update_failures_total.inc();
                }
                error!(error = %e, "Regime update failed, keeping previous record");
                None
            }
        }
    }

    /// One full cycle stamped at `now`.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CacheRecord, EngineError> {
        let signals = signal_store::load_all(self.store.as_ref()).await;
        if let Some(ref metrics) = self.metrics {
            metrics.signals_available.set(signals.len() as i64);
        }
        if signals.is_empty() {
            return Err(EngineError::NoUsableSignals);
        }
        debug!(signals = signals.len(), "Signals loaded");

        let snapshot = self.extractor.snapshot(&signals);
        let (rule_state, crisis) = self.classifier.classify(&snapshot);

        let statistical = FeatureMatrix::from_signals(&signals)
            .and_then(|matrix| clustering::classify_clusters(&matrix, self.clusterer.as_ref()));

        let classification = match statistical {
            Some((state, tier)) => RegimeClassification::statistical(state, tier, now),
            None => RegimeClassification::rule_based(rule_state, now),
        };
        info!(
            state = %classification.state,
            source = ?classification.source,
            confidence = ?classification.confidence,
            "Regime classified"
        );
        info!(
            crisis_score = crisis.score,
            warnings = crisis.warnings.len(),
            "Crisis score computed"
        );

        let mut history = self.history.load().await;
        if let Some(tier) = classification.confidence {
            history.record(classification.classified_at.date_naive(), tier.as_score());
        }

        let trend = (history.len() >= MIN_TREND_POINTS).then(|| history.trend());

        let record = CacheRecord {
            state: classification.state,
            confidence: classification.confidence,
            trend,
            confidence_history: history.values(),
            confidence_sparkline_points: history.sparkline_points(),
            crisis_score: crisis.score,
            warnings: crisis.messages(),
            classifier: classification.source,
            updated_at: classification.classified_at,
        };

        if let Err(e) = self.results.save(&record).await {
            error!(error = %e, "Failed to write regime record");
            return Err(EngineError::Cache(e));
        }
        info!(state = %record.state, "Regime record saved");

        if classification.confidence.is_some() {
            if let Err(e) = self.history.save(&history).await {
                warn!(error = %e, "Failed to persist confidence history");
            }
        }

        Ok(record)
    }
}
