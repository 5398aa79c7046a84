//! QuestDB signal store for daily indicator observations

use crate::config;
use crate::error::StoreError;
use crate::models::signal::{Indicator, Observation, Signal};
use crate::services::signal_store::SignalStore;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls};
use tracing::debug;

pub struct QuestDatabase {
    client: Arc<RwLock<Option<Client>>>,
}

impl QuestDatabase {
    pub async fn new() -> Result<Self, StoreError> {
        Self::connect(&config::get_questdb_url()).await
    }

    pub async fn connect(questdb_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(questdb_url, NoTls).await?;

        // Spawn connection task
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "QuestDB connection error");
            }
        });

        let db = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };

        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.client.read().await;
        if let Some(ref c) = *client {
            // QuestDB syntax: TIMESTAMP must be first, PARTITION BY comes after
            c.execute(
                "CREATE TABLE IF NOT EXISTS observations (
                    timestamp TIMESTAMP,
                    indicator SYMBOL,
                    value DOUBLE
                ) TIMESTAMP(timestamp) PARTITION BY MONTH",
                &[],
            )
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl SignalStore for QuestDatabase {
    async fn load(&self, indicator: Indicator) -> Result<Option<Signal>, StoreError> {
        let client = self.client.read().await;
        let Some(ref c) = *client else {
            return Ok(None);
        };

        let rows = c
            .query(
                "SELECT timestamp, value FROM observations WHERE indicator = $1 ORDER BY timestamp ASC",
                &[&indicator.key()],
            )
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        // Several rows on one day collapse to the last one written.
        let mut observations: Vec<Observation> = Vec::with_capacity(rows.len());
        for row in rows {
            let timestamp: NaiveDateTime = row.get(0);
            let value: Option<f64> = row.get(1);
            let Some(value) = value else { continue };
            let date = timestamp.date();

            match observations.last_mut() {
                Some(last) if last.date == date => last.value = value,
                _ => observations.push(Observation::new(date, value)),
            }
        }

        debug!(indicator = %indicator, points = observations.len(), "Loaded signal from QuestDB");
        Ok(Some(Signal::new(indicator, observations)?))
    }
}
