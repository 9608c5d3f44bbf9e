//! Local storage for content-addressed assets.
//!
//! [`AssetCache`] is the contract the synchronization engine reads and merges
//! through. [`MemoryAssetCache`] is the in-process implementation, and
//! [`FileSystemStore`] keeps raw blobs in a directory keyed by checksum.

use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;

pub mod config;
pub mod fs;
pub mod memory;
pub mod purge;

pub use config::CacheConfig;
pub use fs::FileSystemStore;
pub use memory::MemoryAssetCache;
pub use purge::spawn_purge_task;

/// Concurrent keyed store mapping checksum to asset.
///
/// Implementations must be safe to share between concurrent synchronizations.
/// They are free to drop entries at any time; callers treat presence as a
/// snapshot, not a guarantee.
pub trait AssetCache<A>: Send + Sync {
    /// Returns the resident asset, if any.
    fn try_get(&self, checksum: &Checksum) -> Option<A>;

    fn contains(&self, checksum: &Checksum) -> bool;

    /// Inserts `asset` unless an entry already exists, and returns whichever
    /// value is resident afterwards.
    ///
    /// Equal checksums imply equal content, so keeping the existing entry is
    /// indistinguishable from overwriting it.
    fn get_or_add(&self, checksum: Checksum, asset: A) -> A;
}

impl<A, T> AssetCache<A> for Arc<T>
where
    T: AssetCache<A> + ?Sized,
{
    fn try_get(&self, checksum: &Checksum) -> Option<A> {
        (**self).try_get(checksum)
    }

    fn contains(&self, checksum: &Checksum) -> bool {
        (**self).contains(checksum)
    }

    fn get_or_add(&self, checksum: Checksum, asset: A) -> A {
        (**self).get_or_add(checksum, asset)
    }
}
