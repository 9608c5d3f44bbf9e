use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use eyre::Result as EyreResult;

use crate::cli::fetch::FetchCommand;
use crate::cli::init::InitCommand;
use crate::cli::put::PutCommand;

mod fetch;
mod init;
mod put;

pub const EXAMPLES: &str = r"
  # Initialize a home directory
  $ assetsync init --home data

  # Store two files and print their checksums
  $ assetsync put --home data README.md Cargo.toml

  # Synchronize assets by checksum
  $ assetsync fetch --home data 8ZW1...kQ 3vPf...x2
";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct RootCommand {
    #[command(flatten)]
    pub args: RootArgs,

    #[command(subcommand)]
    pub action: SubCommands,
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    Init(InitCommand),
    Put(PutCommand),
    Fetch(FetchCommand),
}

#[derive(Debug, Parser)]
pub struct RootArgs {
    /// Directory for config and blobs
    #[arg(long, value_name = "PATH", default_value_t = default_home())]
    #[arg(env = "ASSETSYNC_HOME", hide_env_values = true)]
    pub home: Utf8PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl RootCommand {
    pub async fn run(self) -> EyreResult<()> {
        match self.action {
            SubCommands::Init(init) => init.run(&self.args),
            SubCommands::Put(put) => put.run(&self.args).await,
            SubCommands::Fetch(fetch) => fetch.run(&self.args).await,
        }
    }
}

fn default_home() -> Utf8PathBuf {
    let Some(home) = dirs::home_dir() else {
        return Utf8PathBuf::from(".assetsync");
    };

    Utf8PathBuf::try_from(home).map_or_else(
        |_| Utf8PathBuf::from(".assetsync"),
        |home| home.join(".assetsync"),
    )
}
