//! Autocomplete command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use cardvault_core::CardSearch;

use crate::config::Settings;

#[derive(Args, Debug)]
pub struct AutocompleteArgs {
    /// Partial card name
    pub query: String,
}

pub async fn run(args: AutocompleteArgs, settings: Settings) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Ok(());
    }

    let names = settings.gateway()?.autocomplete(query).await;
    if names.is_empty() {
        eprintln!("{}", "No suggestions.".dimmed());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
