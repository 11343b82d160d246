//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{
    autocomplete::AutocompleteArgs, card::CardArgs, collection::CollectionCommand,
    config::ConfigCommand, search::SearchArgs, serve::ServeArgs, sets::SetsArgs,
};

/// Magic: The Gathering card collection server and tool.
#[derive(Parser, Debug)]
#[command(name = "cardvault")]
#[command(author, version = env!("CARDVAULT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for values otherwise read from the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Config file (defaults to config.json in the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the card cache and collections
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Scryfall API base URL
    #[arg(long, global = true)]
    pub scryfall_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve(ServeArgs),

    /// Search cards by query or structured filters
    Search(SearchArgs),

    /// Look up a single card
    Card(CardArgs),

    /// Suggest card names
    Autocomplete(AutocompleteArgs),

    /// List printing sets
    Sets(SetsArgs),

    /// Manage a user's collection in the local store
    Collection(CollectionCommand),

    /// Inspect configuration
    Config(ConfigCommand),
}
