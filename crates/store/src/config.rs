use core::time::Duration;

use eyre::{bail, Result as EyreResult};
use serde::{Deserialize, Serialize};

/// Default idle time after which an unaccessed entry may be purged (3 minutes)
pub const DEFAULT_PURGE_AFTER_MS: u64 = 180_000;

/// Default period of the purge task (30 seconds)
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 30_000;

/// Eviction settings for [`MemoryAssetCache`](crate::MemoryAssetCache).
///
/// `purge_after` should be well above the time a single fetch takes: the
/// purge task runs alongside synchronizations, and an entry evicted between
/// merge and read-back surfaces as a missing asset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CacheConfig {
    /// Whether the background purge task runs at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(
        rename = "purge_after_ms",
        with = "assetsync_primitives::serde_duration"
    )]
    pub purge_after: Duration,

    #[serde(
        rename = "cleanup_interval_ms",
        with = "assetsync_primitives::serde_duration"
    )]
    pub cleanup_interval: Duration,
}

impl CacheConfig {
    #[must_use]
    pub const fn new(enabled: bool, purge_after: Duration, cleanup_interval: Duration) -> Self {
        Self {
            enabled,
            purge_after,
            cleanup_interval,
        }
    }

    /// Rejects settings the purge task cannot run with.
    pub fn validate(&self) -> EyreResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.cleanup_interval.is_zero() {
            bail!("cache.cleanup_interval_ms must be greater than zero");
        }

        if self.purge_after.is_zero() {
            bail!("cache.purge_after_ms must be greater than zero");
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            purge_after: Duration::from_millis(DEFAULT_PURGE_AFTER_MS),
            cleanup_interval: Duration::from_millis(DEFAULT_CLEANUP_INTERVAL_MS),
        }
    }
}

const fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        CacheConfig::default().validate().unwrap();
    }

    #[test]
    fn test_zero_cleanup_interval_is_rejected() {
        let config = CacheConfig::new(true, Duration::from_secs(1), Duration::ZERO);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cleanup_interval_ms"));
    }

    #[test]
    fn test_zero_purge_after_is_rejected() {
        let config = CacheConfig::new(true, Duration::ZERO, Duration::from_secs(1));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("purge_after_ms"));
    }

    #[test]
    fn test_disabled_config_skips_checks() {
        let config = CacheConfig::new(false, Duration::ZERO, Duration::ZERO);

        config.validate().unwrap();
    }
}
