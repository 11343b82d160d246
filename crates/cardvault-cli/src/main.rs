//! cardvault - card collection server and command line tool.
//!
//! `cardvault serve` runs the HTTP API. The remaining commands talk to the
//! card API and the local store directly, for exploration and scripting.

mod cli;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let settings = Settings::load(&cli.global)?;

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args, settings).await,
        Commands::Search(args) => commands::search::run(args, settings).await,
        Commands::Card(args) => commands::card::run(args, settings).await,
        Commands::Autocomplete(args) => commands::autocomplete::run(args, settings).await,
        Commands::Sets(args) => commands::sets::run(args, settings).await,
        Commands::Collection(cmd) => commands::collection::handle(cmd, settings).await,
        Commands::Config(cmd) => commands::config::handle(cmd, settings),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
