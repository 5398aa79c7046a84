//! Regimetrix Worker
//!
//! Recomputes the macro regime and crisis score on a cron schedule and
//! writes the result record read by the dashboard.

use dotenvy::dotenv;
use regimetrix::config::EngineConfig;
use regimetrix::core::bootstrap;
use regimetrix::core::scheduler::RegimeScheduler;
use regimetrix::logging;
use regimetrix::metrics::Metrics;
use regimetrix::signals::engine::RegimeEngine;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    // Initialize logging based on environment
    logging::init_logging();

    let env = regimetrix::config::get_environment();
    info!("Starting Regimetrix Worker");
    info!(environment = %env, "Environment");

    let config = EngineConfig::from_env();
    info!(
        data_dir = %config.data_dir.display(),
        signal_source = ?config.signal_source,
        cache_backend = ?config.cache_backend,
        cron = %config.update_cron,
        run_once = config.run_once,
        "Configuration loaded"
    );

    let metrics = Arc::new(Metrics::new()?);

    let signals = bootstrap::build_signal_store(&config).await?;
    let documents = bootstrap::build_document_store(&config).await?;

    let engine = Arc::new(
        RegimeEngine::new(signals, documents)
            .with_thresholds(config.thresholds)
            .with_metrics(metrics.clone()),
    );

    if config.run_once {
        let outcome = engine.update_regime().await;
        match metrics.export() {
            Ok(text) => tracing::debug!(metrics = %text, "Cycle metrics"),
            Err(e) => warn!(error = %e, "Failed to export metrics"),
        }
        return match outcome {
            Some(record) => {
                info!(state = %record.state, crisis_score = record.crisis_score, "Single update complete");
                Ok(())
            }
            None => Err("regime update produced no record".into()),
        };
    }

    // Run once at startup so readers do not wait for the first tick
    if engine.update_regime().await.is_none() {
        warn!("Initial regime update failed; waiting for the next scheduled run");
    }

    info!("Starting regime scheduler...");
    let scheduler = RegimeScheduler::new(engine.clone(), &config.update_cron)?;
    scheduler.start().await;

    // Graceful shutdown
    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down worker...");
    scheduler.stop().await;
    info!("Worker stopped");

    Ok(())
}
