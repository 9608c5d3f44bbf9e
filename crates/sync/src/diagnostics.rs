//! Duration-gated reporting for coarse synchronizations.
//!
//! A [`SlowSyncScope`] measures wall-clock time from creation to drop and
//! reports to a [`SyncDiagnostics`] sink only if the threshold was exceeded.
//! Reporting has no effect on the synchronization itself.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::warn;

/// Receives reports about synchronizations that took too long.
pub trait SyncDiagnostics: Send + Sync {
    fn slow_synchronization(&self, operation: &'static str, description: &str, elapsed: Duration);
}

/// Reports slow synchronizations as `tracing` warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingDiagnostics;

impl SyncDiagnostics for TracingDiagnostics {
    fn slow_synchronization(&self, operation: &'static str, description: &str, elapsed: Duration) {
        warn!(
            operation,
            description,
            elapsed_ms = elapsed.as_millis(),
            "Slow synchronization"
        );
    }
}

/// Timing guard for one coarse synchronization.
pub struct SlowSyncScope {
    sink: Arc<dyn SyncDiagnostics>,
    operation: &'static str,
    description: String,
    threshold: Duration,
    started: Instant,
}

impl SlowSyncScope {
    #[must_use]
    pub fn start(
        sink: Arc<dyn SyncDiagnostics>,
        operation: &'static str,
        description: String,
        threshold: Duration,
    ) -> Self {
        Self {
            sink,
            operation,
            description,
            threshold,
            started: Instant::now(),
        }
    }
}

impl Drop for SlowSyncScope {
    fn drop(&mut self) {
        let elapsed = self.started.elapsed();

        if elapsed > self.threshold {
            self.sink
                .slow_synchronization(self.operation, &self.description, elapsed);
        }
    }
}

impl fmt::Debug for SlowSyncScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlowSyncScope")
            .field("operation", &self.operation)
            .field("description", &self.description)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}
