use anyhow::Result;
use clap::Parser;

mod backoff;
mod cli;
mod diff;
mod enrich;
mod expand;
mod generate;
mod sizes;
mod table;
mod util;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Expand(args) => expand::run(&args),
        Command::Diff(args) => diff::run(&args),
        Command::Enrich(args) => enrich::run(&args),
    }
}
