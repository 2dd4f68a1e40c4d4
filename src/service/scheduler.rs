//! Refresh scheduler: the long-lived background loop.
//!
//! ```text
//! Idle → Fetching → Scoring → Writing → Sleeping → Fetching → …
//! ```
//!
//! A failed cycle is logged and abandoned; the loop still sleeps the normal
//! interval before trying again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::refresh_service::RefreshService;

/// Drives [`RefreshService::refresh`] at a fixed interval until cancelled.
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    refresh: Arc<RefreshService>,
    interval: Duration,
    cancel: CancellationToken,
}

impl RefreshScheduler {
    /// Creates a scheduler.
    #[must_use]
    pub fn new(refresh: Arc<RefreshService>, interval: Duration, cancel: CancellationToken) -> Self {
        Self {
            refresh,
            interval,
            cancel,
        }
    }

    /// Runs one cycle and logs the outcome. Returns whether it succeeded.
    pub async fn run_once(&self) -> bool {
        match self.refresh.refresh().await {
            Ok(report) => {
                tracing::info!(
                    coins = report.snapshots.len(),
                    elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
                    "refresh cycle complete"
                );
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "refresh cycle failed, retrying next tick");
                false
            }
        }
    }

    /// Sleeps, refreshes, and repeats until the token is cancelled.
    ///
    /// A cycle that has already started is allowed to finish. Returns the
    /// number of cycles attempted.
    pub async fn run(self) -> u64 {
        let mut cycles: u64 = 0;
        loop {
            tokio::select! {
                () = self.cancel.cancelled() => break,
                () = tokio::time::sleep(self.interval) => {}
            }
            self.run_once().await;
            cycles = cycles.saturating_add(1);
        }
        tracing::info!(cycles, "refresh loop stopped");
        cycles
    }

    /// Spawns [`RefreshScheduler::run`] onto the runtime.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<u64> {
        tokio::spawn(self.run())
    }

    /// Runs the first cycle to completion, then spawns the loop.
    ///
    /// A failed first cycle does not prevent the loop from starting. Returns
    /// whether the first cycle succeeded along with the loop handle.
    pub async fn start(self) -> (bool, JoinHandle<u64>) {
        let first_ok = self.run_once().await;
        (first_ok, self.spawn())
    }
}
