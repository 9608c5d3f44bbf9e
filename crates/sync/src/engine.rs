//! Cache-fill engine: guarantees assets are locally resident, fetching only
//! what is missing in a single batched request per synchronization.

use core::fmt;
use core::marker::PhantomData;
use core::slice;
use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;
use assetsync_primitives::hint::AssetHint;
use assetsync_store::AssetCache;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{SyncError, SyncResult};
use crate::pool::ChecksumPool;
use crate::source::AssetSource;

struct EngineInner<C, S, X> {
    root: Checksum,
    cache: C,
    source: S,
    context: X,
    pool: Arc<ChecksumPool>,
}

/// Resolves assets by checksum through a local cache backed by a remote
/// [`AssetSource`].
///
/// Cloning is cheap and clones share the same cache, source and pool. The
/// engine holds no locks of its own: concurrent calls for overlapping
/// checksums may each fetch the same asset, which is harmless since equal
/// checksums carry equal content.
pub struct SyncEngine<A, C, S>
where
    S: AssetSource<A>,
{
    inner: Arc<EngineInner<C, S, S::Context>>,
    _asset: PhantomData<fn() -> A>,
}

impl<A, C, S> SyncEngine<A, C, S>
where
    A: Clone + Send + Sync + 'static,
    C: AssetCache<A>,
    S: AssetSource<A>,
{
    /// Creates an engine whose requests are scoped to `root`.
    pub fn new(
        root: Checksum,
        cache: C,
        source: S,
        context: S::Context,
        pool: Arc<ChecksumPool>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                root,
                cache,
                source,
                context,
                pool,
            }),
            _asset: PhantomData,
        }
    }

    /// Checksum forwarded to the source as the scope of every request.
    #[must_use]
    pub fn root(&self) -> Checksum {
        self.inner.root
    }

    #[must_use]
    pub fn cache(&self) -> &C {
        &self.inner.cache
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<ChecksumPool> {
        &self.inner.pool
    }

    /// Returns the asset for `checksum`, fetching it if it is not cached.
    pub async fn get(&self, checksum: Checksum, cancel: &CancellationToken) -> SyncResult<A> {
        if checksum.is_null() {
            return Err(SyncError::NullChecksum);
        }

        if let Some(asset) = self.inner.cache.try_get(&checksum) {
            trace!(%checksum, "Asset served from cache");
            return Ok(asset);
        }

        self.synchronize(AssetHint::FULL, slice::from_ref(&checksum), cancel)
            .await?;

        self.inner
            .cache
            .try_get(&checksum)
            .ok_or(SyncError::MissingAfterSync(checksum))
    }

    /// Returns every requested asset paired with its checksum, fetching the
    /// missing ones in a single request.
    ///
    /// Pairs are not guaranteed to follow the input order.
    pub async fn get_bulk(
        &self,
        hint: AssetHint,
        checksums: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<Vec<(Checksum, A)>> {
        self.synchronize(hint, checksums, cancel).await?;

        checksums
            .iter()
            .map(|checksum| {
                self.inner
                    .cache
                    .try_get(checksum)
                    .map(|asset| (*checksum, asset))
                    .ok_or(SyncError::MissingAfterSync(*checksum))
            })
            .collect()
    }

    /// Populates the cache with `checksums` for later hits.
    ///
    /// Same as [`Self::synchronize`]; failures still propagate.
    pub async fn warm(
        &self,
        hint: AssetHint,
        checksums: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<()> {
        self.synchronize(hint, checksums, cancel).await
    }

    /// Makes every checksum in `checksums` resident in the cache.
    ///
    /// Issues at most one request to the source, covering exactly the
    /// checksums found missing. Checksums are expected to be distinct;
    /// duplicates that are missing are requested once per occurrence.
    ///
    /// On failure the cache may hold a subset of the requested assets.
    pub async fn synchronize(
        &self,
        hint: AssetHint,
        checksums: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<()> {
        if checksums.iter().any(Checksum::is_null) {
            return Err(SyncError::NullChecksum);
        }

        if checksums.is_empty() {
            return Ok(());
        }

        let cache = &self.inner.cache;

        // Only an estimate: the cache may gain or lose entries before the
        // filling pass below, which is the authoritative one.
        let expected = checksums
            .iter()
            .filter(|checksum| !cache.contains(checksum))
            .count();

        if expected == 0 {
            trace!(count = checksums.len(), "All assets already cached");
            return Ok(());
        }

        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        let mut missing = self.inner.pool.scratch(expected);

        for checksum in checksums {
            if !cache.contains(checksum) {
                missing.push(*checksum);
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        self.fetch_and_merge(hint, &missing, cancel).await
    }

    async fn fetch_and_merge(
        &self,
        hint: AssetHint,
        missing: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<()> {
        let inner = &*self.inner;

        debug!(
            root = %inner.root,
            ?hint,
            missing = missing.len(),
            "Requesting missing assets"
        );

        let assets = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(SyncError::Cancelled),
            result = inner.source.fetch(inner.root, hint, missing, &inner.context) => {
                result.map_err(SyncError::Source)?
            }
        };

        if assets.len() != missing.len() {
            return Err(SyncError::ResponseLengthMismatch {
                requested: missing.len(),
                received: assets.len(),
            });
        }

        for (checksum, asset) in missing.iter().zip(assets) {
            let _resident = inner.cache.get_or_add(*checksum, asset);
        }

        Ok(())
    }
}

impl<A, C, S> Clone for SyncEngine<A, C, S>
where
    S: AssetSource<A>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _asset: PhantomData,
        }
    }
}

impl<A, C, S> fmt::Debug for SyncEngine<A, C, S>
where
    S: AssetSource<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("root", &self.inner.root)
            .field("pool", &self.inner.pool)
            .finish_non_exhaustive()
    }
}
