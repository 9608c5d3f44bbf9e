use std::env::var;

use clap::Parser;
use eyre::Result as EyreResult;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};

use crate::cli::RootCommand;

mod cli;
mod source;

#[tokio::main]
async fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let command = RootCommand::parse();

    setup(command.args.verbose);

    command.run().await
}

fn setup(verbose: u8) {
    let directives = match verbose {
        0 => var("RUST_LOG").unwrap_or_else(|_| "assetsync=info".to_owned()),
        1 => "assetsync=debug".to_owned(),
        _ => "assetsync=trace".to_owned(),
    };

    registry()
        .with(EnvFilter::builder().parse_lossy(directives))
        .with(layer())
        .init();
}
