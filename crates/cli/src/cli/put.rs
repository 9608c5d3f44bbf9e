use assetsync_config::ConfigFile;
use assetsync_store::FileSystemStore;
use camino::Utf8PathBuf;
use clap::Parser;
use eyre::{Result as EyreResult, WrapErr};
use tracing::debug;

use crate::cli::RootArgs;

/// Store files in the blob directory and print their checksums
#[derive(Debug, Parser)]
pub struct PutCommand {
    /// Files to store
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<Utf8PathBuf>,
}

impl PutCommand {
    pub async fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let config = ConfigFile::load(&root_args.home)?;
        let store = FileSystemStore::new(&config.source.path).await?;

        for file in &self.files {
            let data = tokio::fs::read(file)
                .await
                .wrap_err_with(|| format!("failed to read {file}"))?;

            let checksum = store.put(&data).await?;

            debug!(%file, %checksum, size = data.len(), "Stored asset");

            println!("{checksum}  {file}");
        }

        Ok(())
    }
}
