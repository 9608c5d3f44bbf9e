//! Synchronization of whole asset trees.
//!
//! An [`Expander`] starts from a root checksum and walks the tree one level at
//! a time: each level is fetched with a single engine synchronization, then
//! the children referenced by its assets form the next level. It only uses
//! the engine's public retrieval operations.

use core::fmt;
use core::time::Duration;
use std::collections::HashSet;
use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;
use assetsync_primitives::hint::AssetHint;
use assetsync_store::AssetCache;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SyncConfig;
use crate::diagnostics::{SlowSyncScope, SyncDiagnostics, TracingDiagnostics};
use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use crate::source::AssetSource;

/// Describes how assets reference their descendants.
pub trait AssetTree<A>: Send + Sync {
    /// Checksums of the assets directly referenced by `asset`.
    ///
    /// Null entries are treated as absent references and skipped.
    fn children(&self, asset: &A) -> Vec<Checksum>;
}

pub struct Expander<A, C, S, T>
where
    S: AssetSource<A>,
{
    engine: SyncEngine<A, C, S>,
    tree: T,
    diagnostics: Arc<dyn SyncDiagnostics>,
    slow_threshold: Duration,
}

impl<A, C, S, T> Expander<A, C, S, T>
where
    A: Clone + Send + Sync + 'static,
    C: AssetCache<A>,
    S: AssetSource<A>,
    T: AssetTree<A>,
{
    pub fn new(engine: SyncEngine<A, C, S>, tree: T, config: &SyncConfig) -> Self {
        Self {
            engine,
            tree,
            diagnostics: Arc::new(TracingDiagnostics),
            slow_threshold: config.slow_sync_threshold,
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn SyncDiagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub const fn engine(&self) -> &SyncEngine<A, C, S> {
        &self.engine
    }

    /// Synchronizes an explicit set of checksums in one engine call.
    pub async fn synchronize_all(
        &self,
        hint: AssetHint,
        checksums: &[Checksum],
        cancel: &CancellationToken,
    ) -> SyncResult<()> {
        let _scope = self.scope(
            "synchronize_all",
            format!("{} checksums", checksums.len()),
            cancel,
        )?;

        self.engine.synchronize(hint, checksums, cancel).await
    }

    /// Synchronizes `root` and everything reachable from it.
    ///
    /// Returns the number of distinct assets in the tree.
    pub async fn synchronize_root(
        &self,
        root: Checksum,
        cancel: &CancellationToken,
    ) -> SyncResult<usize> {
        if root.is_null() {
            return Err(SyncError::NullChecksum);
        }

        let _scope = self.scope("synchronize_root", format!("root {root}"), cancel)?;

        let mut seen = HashSet::from([root]);
        let mut level = vec![root];
        let mut hint = AssetHint::ROOT;
        let mut depth = 0_usize;

        while !level.is_empty() {
            let assets = self.engine.get_bulk(hint, &level, cancel).await?;

            let mut next = Vec::new();

            for (_, asset) in &assets {
                for child in self.tree.children(asset) {
                    if !child.is_null() && seen.insert(child) {
                        next.push(child);
                    }
                }
            }

            debug!(%root, depth, synchronized = level.len(), "Synchronized tree level");

            level = next;
            hint = AssetHint::subtree(root);
            depth = depth.saturating_add(1);
        }

        Ok(seen.len())
    }

    fn scope(
        &self,
        operation: &'static str,
        description: String,
        cancel: &CancellationToken,
    ) -> SyncResult<SlowSyncScope> {
        if cancel.is_cancelled() {
            return Err(SyncError::Cancelled);
        }

        Ok(SlowSyncScope::start(
            Arc::clone(&self.diagnostics),
            operation,
            description,
            self.slow_threshold,
        ))
    }
}

impl<A, C, S, T> fmt::Debug for Expander<A, C, S, T>
where
    S: AssetSource<A>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expander")
            .field("engine", &self.engine)
            .field("slow_threshold", &self.slow_threshold)
            .finish_non_exhaustive()
    }
}
