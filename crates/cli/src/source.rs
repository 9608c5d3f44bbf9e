use std::sync::Arc;

use assetsync_primitives::checksum::Checksum;
use assetsync_primitives::hint::AssetHint;
use assetsync_store::FileSystemStore;
use assetsync_sync::AssetSource;
use async_trait::async_trait;
use eyre::{bail, OptionExt};
use tracing::trace;

/// Serves raw blobs out of a [`FileSystemStore`], verifying each one against
/// the checksum it was requested by.
#[derive(Clone, Debug)]
pub struct FileSystemSource {
    store: FileSystemStore,
}

impl FileSystemSource {
    pub const fn new(store: FileSystemStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AssetSource<Arc<[u8]>> for FileSystemSource {
    type Context = ();

    async fn fetch(
        &self,
        root: Checksum,
        hint: AssetHint,
        checksums: &[Checksum],
        _context: &(),
    ) -> eyre::Result<Vec<Arc<[u8]>>> {
        trace!(%root, ?hint, count = checksums.len(), "Reading blobs");

        let mut assets = Vec::with_capacity(checksums.len());

        for checksum in checksums {
            let data = self
                .store
                .get(checksum)
                .await?
                .ok_or_eyre(format!("blob {checksum} not found in {}", self.store.root()))?;

            let actual = Checksum::of(&data);
            if actual != *checksum {
                bail!("blob {checksum} is corrupt, content hashes to {actual}");
            }

            assets.push(Arc::from(data));
        }

        Ok(assets)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8Path;

    use super::*;

    async fn source() -> (tempfile::TempDir, FileSystemSource) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap().join("blobs");
        let store = FileSystemStore::new(&root).await.unwrap();

        (dir, FileSystemSource::new(store))
    }

    #[tokio::test]
    async fn test_fetch_preserves_request_order() {
        let (_dir, source) = source().await;

        let a = source.store.put(b"alpha").await.unwrap();
        let b = source.store.put(b"beta").await.unwrap();

        let assets = source
            .fetch(Checksum::NULL, AssetHint::FULL, &[b, a, b], &())
            .await
            .unwrap();

        assert_eq!(assets.len(), 3);
        assert_eq!(&*assets[0], b"beta");
        assert_eq!(&*assets[1], b"alpha");
        assert_eq!(&*assets[2], b"beta");
    }

    #[tokio::test]
    async fn test_fetch_missing_blob_fails() {
        let (_dir, source) = source().await;

        let err = source
            .fetch(
                Checksum::NULL,
                AssetHint::FULL,
                &[Checksum::of(b"absent")],
                &(),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_fetch_detects_corruption() {
        let (_dir, source) = source().await;

        let id = source.store.put(b"original").await.unwrap();
        std::fs::write(source.store.root().join(id.to_base58()), b"tampered").unwrap();

        let err = source
            .fetch(Checksum::NULL, AssetHint::FULL, &[id], &())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("corrupt"));
    }
}
