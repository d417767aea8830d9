// Retention Sweeper
// Periodic eviction of expired pending/archived entries. Runs on its own
// timer; performs the same synchronous store mutation as the scheduler, so it
// cannot race a submit/schedule cycle.

use crate::application::admission::QueueManager;
use crate::application::shutdown::ShutdownToken;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::info;

/// Sweep scheduler
///
/// Should be spawned in tokio::spawn by the composition root; stops when the
/// shutdown token fires.
pub struct SweepScheduler {
    manager: Arc<QueueManager>,
    sweep_interval: Duration,
}

impl SweepScheduler {
    pub fn new(manager: Arc<QueueManager>) -> Self {
        let sweep_interval = Duration::from_millis(manager.config().sweep_interval_ms);
        Self {
            manager,
            sweep_interval,
        }
    }

    /// Run the sweep loop until shutdown.
    pub async fn run(self, mut shutdown: ShutdownToken) {
        info!(
            interval_ms = self.sweep_interval.as_millis() as u64,
            retention_ms = self.manager.config().retention_window_ms,
            "Retention sweeper started"
        );

        let mut tick = interval(self.sweep_interval);
        // The first tick fires immediately; skip it so a fresh queue is not
        // swept at startup.
        tick.tick().await;

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    let stats = self.manager.sweep_expired().await;
                    info!(
                        pending_removed = stats.pending_removed,
                        archived_removed = stats.archived_removed,
                        "Retention sweep completed"
                    );
                }
                _ = shutdown.wait() => {
                    info!("Retention sweeper stopped");
                    return;
                }
            }
        }
    }

    /// Run one sweep immediately (manual trigger).
    pub async fn run_now(&self) {
        let stats = self.manager.sweep_expired().await;
        info!(
            pending_removed = stats.pending_removed,
            archived_removed = stats.archived_removed,
            "Manual sweep completed"
        );
    }
}
