//! Live device telemetry feed
//!
//! Polls a read-only JSON endpoint for meter records and republishes the
//! latest batch on a watch channel. The feed is side-channel data: a
//! failed poll keeps the previous batch on display and never disturbs
//! reconciliation.

use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use voltmesh_types::TelemetryRecord;

pub struct TelemetryFeed {
    http: reqwest::Client,
    url: String,
    publisher: watch::Sender<Vec<TelemetryRecord>>,
}

impl TelemetryFeed {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build telemetry http client")?;
        let (publisher, _) = watch::channel(Vec::new());
        Ok(Self { http, url, publisher })
    }

    /// Subscribe to telemetry batches. Starts with an empty batch until
    /// the first successful poll.
    pub fn subscribe(&self) -> watch::Receiver<Vec<TelemetryRecord>> {
        self.publisher.subscribe()
    }

    /// Fetch one batch of records from the endpoint.
    pub async fn fetch(&self) -> Result<Vec<TelemetryRecord>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("telemetry request failed")?
            .error_for_status()
            .context("telemetry endpoint returned an error status")?;

        response
            .json::<Vec<TelemetryRecord>>()
            .await
            .context("failed to decode telemetry records")
    }

    /// Poll the endpoint until the task is cancelled.
    pub async fn run(&self, poll_interval: Duration) {
        let mut timer = tokio::time::interval(poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            timer.tick().await;
            match self.fetch().await {
                Ok(records) => {
                    debug!("telemetry poll returned {} records", records.len());
                    self.publisher.send_replace(records);
                }
                Err(e) => {
                    // Previous batch stays published.
                    warn!("telemetry poll failed: {:#}", e);
                }
            }
        }
    }
}
