use assetsync_config::ConfigFile;
use clap::Parser;
use eyre::{bail, Result as EyreResult, WrapErr};
use tracing::{info, warn};

use crate::cli::RootArgs;

/// Initialize a home directory with a default configuration
#[derive(Debug, Parser)]
pub struct InitCommand {
    /// Overwrite an existing configuration
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let home = &root_args.home;

        if ConfigFile::exists(home) {
            if !self.force {
                bail!("home directory {home} is already initialized, use --force to overwrite");
            }

            warn!(%home, "Overwriting existing configuration");
        }

        let config = ConfigFile::for_home(home);

        std::fs::create_dir_all(&config.source.path)
            .wrap_err_with(|| format!("failed to create {}", config.source.path))?;

        config.save(home)?;

        info!(%home, source = %config.source.path, "Initialized home directory");

        Ok(())
    }
}
