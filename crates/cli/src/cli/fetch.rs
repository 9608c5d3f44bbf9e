use std::sync::Arc;

use assetsync_config::ConfigFile;
use assetsync_primitives::checksum::Checksum;
use assetsync_primitives::hint::AssetHint;
use assetsync_store::{spawn_purge_task, FileSystemStore, MemoryAssetCache};
use assetsync_sync::{ChecksumPool, SyncEngine};
use clap::Parser;
use eyre::{Result as EyreResult, WrapErr};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::RootArgs;
use crate::source::FileSystemSource;

/// Synchronize assets by checksum and print their sizes
#[derive(Debug, Parser)]
pub struct FetchCommand {
    /// Checksums to synchronize, base58 encoded
    #[arg(value_name = "CHECKSUM", required = true)]
    pub checksums: Vec<Checksum>,
}

impl FetchCommand {
    pub async fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let config = ConfigFile::load(&root_args.home)?;

        let store = FileSystemStore::new(&config.source.path).await?;
        let cache = MemoryAssetCache::<Arc<[u8]>>::new();
        let pool = Arc::new(ChecksumPool::from_config(&config.sync));
        let cancel = CancellationToken::new();

        let purge = spawn_purge_task(cache.clone(), config.cache, cancel.clone());

        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling synchronization");
                    cancel.cancel();
                }
            })
        };

        let root = Checksum::of_json(&self.checksums)?;
        let engine = SyncEngine::new(root, cache, FileSystemSource::new(store), (), pool);

        debug!(%root, count = self.checksums.len(), "Synchronizing assets");

        let result = engine
            .get_bulk(AssetHint::FULL, &self.checksums, &cancel)
            .await
            .wrap_err("failed to synchronize assets");

        cancel.cancel();
        interrupt.abort();
        if let Some(purge) = purge {
            purge.await?;
        }

        for (checksum, asset) in result? {
            println!("{checksum}  {}", asset.len());
        }

        let stats = engine.pool().stats();
        info!(
            leased = stats.leased,
            returned = stats.returned,
            dedicated = stats.dedicated,
            "Synchronization complete"
        );

        Ok(())
    }
}
