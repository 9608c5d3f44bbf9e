use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::memory::MemoryAssetCache;

/// Periodically purges idle entries from `cache` until `cancel` fires.
///
/// Returns `None` without spawning anything when purging is disabled or the
/// configuration fails [`CacheConfig::validate`].
pub fn spawn_purge_task<A>(
    cache: MemoryAssetCache<A>,
    config: CacheConfig,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>>
where
    A: Send + Sync + 'static,
{
    if !config.enabled {
        debug!("Cache purge task disabled");
        return None;
    }

    if let Err(err) = config.validate() {
        warn!(%err, "Cache purge task not started");
        return None;
    }

    let handle = tokio::spawn(async move {
        let mut interval = time::interval(config.cleanup_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately
        let _first = interval.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let _purged = cache.purge_idle(config.purge_after);
                }
            }
        }

        info!("Cache purge task stopped");
    });

    Some(handle)
}
