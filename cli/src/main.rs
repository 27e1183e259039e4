mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{aggregate, summary};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "vansetu=warn,vansetu_cli=warn",
        1 => "vansetu=info,vansetu_cli=info",
        _ => "vansetu=debug,vansetu_cli=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Aggregate(args) => aggregate::run(&cli, args),
        Commands::Summary(args) => summary::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
