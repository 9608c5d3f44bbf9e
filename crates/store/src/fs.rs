use std::io::ErrorKind;

use assetsync_primitives::checksum::Checksum;
use camino::{Utf8Path, Utf8PathBuf};
use eyre::WrapErr;
use tokio::fs;

/// Directory of blobs, one file per checksum, named by its base58 form.
#[derive(Clone, Debug)]
pub struct FileSystemStore {
    root: Utf8PathBuf,
}

impl FileSystemStore {
    pub async fn new(root: &Utf8Path) -> eyre::Result<Self> {
        fs::create_dir_all(root)
            .await
            .wrap_err_with(|| format!("failed to create blob directory {root}"))?;

        Ok(Self {
            root: root.to_owned(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path(&self, id: &Checksum) -> Utf8PathBuf {
        self.root.join(id.to_base58())
    }

    pub async fn has(&self, id: &Checksum) -> eyre::Result<bool> {
        fs::try_exists(self.path(id)).await.map_err(Into::into)
    }

    pub async fn get(&self, id: &Checksum) -> eyre::Result<Option<Box<[u8]>>> {
        match fs::read(self.path(id)).await {
            Ok(file) => Ok(Some(file.into_boxed_slice())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Stores `data` under its own checksum and returns that checksum.
    ///
    /// Writing content that is already present is a no-op.
    pub async fn put(&self, data: &[u8]) -> eyre::Result<Checksum> {
        let id = Checksum::of(data);

        if self.has(&id).await? {
            return Ok(id);
        }

        fs::write(self.path(&id), data)
            .await
            .wrap_err_with(|| format!("failed to write blob {id}"))?;

        Ok(id)
    }
}
