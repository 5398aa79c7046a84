//! Prometheus metrics for the regime update cycle.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    pub regime_updates_total: IntCounter,
    pub regime_update_failures_total: IntCounter,
    pub regime_update_duration_seconds: Histogram,
    pub crisis_score: IntGauge,
    /// Ordinal of the current state, Bull = 0 through Recession Watch = 3.
    pub regime_state: IntGauge,
    pub signals_available: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let regime_updates_total =
            IntCounter::new("regime_updates_total", "Successful regime update cycles")?;
        let regime_update_failures_total = IntCounter::new(
            "regime_update_failures_total",
            "Regime update cycles that left the cache untouched",
        )?;
        let regime_update_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "regime_update_duration_seconds",
                "Wall time of one regime update cycle",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        let crisis_score = IntGauge::new("regime_crisis_score", "Latest crisis score (0-100)")?;
        let regime_state = IntGauge::new(
            "regime_state",
            "Latest regime state ordinal (0=Bull, 3=Recession Watch)",
        )?;
        let signals_available = IntGauge::new(
            "regime_signals_available",
            "Number of signals available in the latest cycle",
        )?;

        registry.register(Box::new(regime_updates_total.clone()))?;
        registry.register(Box::new(regime_update_failures_total.clone()))?;
        registry.register(Box::new(regime_update_duration_seconds.clone()))?;
        registry.register(Box::new(crisis_score.clone()))?;
        registry.register(Box::new(regime_state.clone()))?;
        registry.register(Box::new(signals_available.clone()))?;

        Ok(Self {
            registry,
            regime_updates_total,
            regime_update_failures_total,
            regime_update_duration_seconds,
            crisis_score,
            regime_state,
            signals_available,
        })
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
