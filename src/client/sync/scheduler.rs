//! # Refresh Scheduler
//!
//! Pulls updates on a fixed interval by calling [`ChatSync::refresh`] from a
//! background task. The core has no push channel, so this is how new messages
//! and edits reach the timeline while the client sits idle.
//!
//! Ticks that fall due while a refresh is still running are skipped rather than
//! queued. Stopping never interrupts a refresh: the loop exits at the next
//! tick boundary.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::ChatSync;

/// Background refresh loop
#[derive(Debug)]
pub struct RefreshScheduler {
    interval: Duration,
    shutdown: Option<watch::Sender<bool>>,
    background_task: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    /// Create a stopped scheduler
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            shutdown: None,
            background_task: None,
        }
    }

    /// Start refreshing `sync` every interval. The first pull happens one
    /// interval from now. Returns `false` if already running.
    pub fn start(&mut self, sync: Arc<ChatSync>) -> bool {
        if self.is_running() {
            return false;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = self.interval;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }
                match sync.refresh().await {
                    Ok(0) => {}
                    Ok(count) => tracing::debug!("Background refresh merged {} records", count),
                    Err(e) => tracing::debug!("Background refresh failed: {}", e),
                }
            }
        });

        tracing::info!("Refresh scheduler started ({:?} interval)", self.interval);
        self.shutdown = Some(shutdown_tx);
        self.background_task = Some(handle);
        true
    }

    /// Ask the loop to exit and wait until it has. A refresh already in
    /// progress completes first.
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(handle) = self.background_task.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Refresh scheduler task ended abnormally: {}", e);
            }
            tracing::info!("Refresh scheduler stopped");
        }
    }

    /// Whether the loop is running
    pub fn is_running(&self) -> bool {
        self.background_task
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Configured interval
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        // Dropping the sender wakes the loop, which exits after any refresh in
        // progress.
        self.shutdown.take();
    }
}
