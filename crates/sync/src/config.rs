//! Synchronization configuration with sensible defaults.
//!
//! Every magic number lives in a named constant so callers and the config file
//! agree on the same defaults.

use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of scratch buffers the pool retains
pub const DEFAULT_POOL_SIZE: usize = 16;

/// Default element capacity of a pooled scratch buffer
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Default duration above which a coarse synchronization is reported (1 second)
pub const DEFAULT_SLOW_SYNC_THRESHOLD_MS: u64 = 1_000;

/// Synchronization configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct SyncConfig {
    /// Scratch buffers retained by the pool between synchronizations
    pub pool_size: usize,

    /// Checksums per pooled scratch buffer
    pub buffer_capacity: usize,

    /// Coarse synchronizations slower than this are reported to diagnostics
    #[serde(
        rename = "slow_sync_threshold_ms",
        with = "assetsync_primitives::serde_duration"
    )]
    pub slow_sync_threshold: Duration,
}

impl SyncConfig {
    #[must_use]
    pub const fn new(
        pool_size: usize,
        buffer_capacity: usize,
        slow_sync_threshold: Duration,
    ) -> Self {
        Self {
            pool_size,
            buffer_capacity,
            slow_sync_threshold,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            slow_sync_threshold: Duration::from_millis(DEFAULT_SLOW_SYNC_THRESHOLD_MS),
        }
    }
}
