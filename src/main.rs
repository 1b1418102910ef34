//! Catalog Sync - command-line entry point.

use catalog_sync::cli;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::from_default_env()
                .add_directive("catalog_sync=info".parse()?)
                .add_directive("catalog=info".parse()?)
                .add_directive("cli=info".parse()?),
        )
        .init();

    cli::run_command(&args)
}
