//! Cron-based scheduler for regime update cycles

use crate::error::ScheduleError;
use crate::signals::engine::RegimeEngine;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Runs `update_regime()` on every cron tick until stopped.
pub struct RegimeScheduler {
    engine: Arc<RegimeEngine>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl RegimeScheduler {
    /// Create a new scheduler
    ///
    /// # Arguments
    /// * `engine` - Engine whose `update_regime` runs on each tick
    /// * `cron_expr` - Six-field cron expression: second minute hour day month weekday
    pub fn new(engine: Arc<RegimeEngine>, cron_expr: &str) -> Result<Self, ScheduleError> {
        let schedule = Schedule::from_str(cron_expr).map_err(|e| ScheduleError {
            expression: cron_expr.to_string(),
            reason: e.to_string(),
        })?;

        info!(cron = %cron_expr, "RegimeScheduler: created (cron: {})", cron_expr);

        Ok(Self {
            engine,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler. Calling it while already running is a no-op.
    pub async fn start(&self) {
        let mut slot = self.handle.write().await;
        if slot.is_some() {
            warn!("RegimeScheduler: already running");
            return;
        }

        let engine = self.engine.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("RegimeScheduler: started, waiting for cron schedule...");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Utc);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Utc::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    // No more scheduled times, wait a bit and check again
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                info!("RegimeScheduler: cron tick, running regime update");
                match engine.update_regime().await {
                    Some(record) => info!(
                        state = %record.state,
                        crisis_score = record.crisis_score,
                        "RegimeScheduler: update complete"
                    ),
                    None => warn!("RegimeScheduler: update produced no record"),
                }
            }
        });

        *slot = Some(handle);
        info!("RegimeScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("RegimeScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
