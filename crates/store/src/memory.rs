//! In-memory asset cache with idle-time eviction.
//!
//! Backed by a `DashMap`, so lookups and inserts from concurrent
//! synchronizations never contend on a global lock. Each entry remembers when
//! it was last read; [`MemoryAssetCache::purge_idle`] drops entries that have
//! not been touched for a given age.

use core::fmt;
use core::time::Duration;
use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::AssetCache;

#[derive(Debug, Clone)]
struct CachedAsset<A> {
    asset: A,
    last_accessed: Instant,
}

impl<A> CachedAsset<A> {
    fn new(asset: A) -> Self {
        Self {
            asset,
            last_accessed: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
    }
}

/// Shared handle to an in-memory checksum → asset map.
///
/// Cloning is cheap and every clone sees the same entries.
pub struct MemoryAssetCache<A> {
    entries: Arc<DashMap<Checksum, CachedAsset<A>>>,
}

impl<A> MemoryAssetCache<A> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes a single entry, returning whether it was present.
    pub fn remove(&self, checksum: &Checksum) -> bool {
        self.entries.remove(checksum).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Evicts entries that have not been read for at least `max_age`.
    ///
    /// Returns the number of entries evicted.
    pub fn purge_idle(&self, max_age: Duration) -> usize {
        let now = Instant::now();
        let before_count = self.entries.len();

        self.entries
            .retain(|_, cached| now.duration_since(cached.last_accessed) < max_age);

        let purged = before_count.saturating_sub(self.entries.len());

        if purged > 0 {
            debug!(
                purged,
                remaining = self.entries.len(),
                "Purged idle assets from cache"
            );
        }

        purged
    }
}

impl<A> Clone for MemoryAssetCache<A> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<A> Default for MemoryAssetCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for MemoryAssetCache<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryAssetCache")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl<A> AssetCache<A> for MemoryAssetCache<A>
where
    A: Clone + Send + Sync,
{
    fn try_get(&self, checksum: &Checksum) -> Option<A> {
        self.entries.get_mut(checksum).map(|mut entry| {
            entry.touch();
            entry.asset.clone()
        })
    }

    fn contains(&self, checksum: &Checksum) -> bool {
        self.entries.contains_key(checksum)
    }

    fn get_or_add(&self, checksum: Checksum, asset: A) -> A {
        self.entries
            .entry(checksum)
            .or_insert_with(|| CachedAsset::new(asset))
            .asset
            .clone()
    }
}
