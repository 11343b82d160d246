//! Sets command implementation.

use anyhow::{Context, Result};
use clap::Args;

use cardvault_core::CardSearch;

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct SetsArgs {
    /// Print the set list as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: SetsArgs, settings: Settings) -> Result<()> {
    let sets = settings
        .gateway()?
        .sets()
        .await
        .context("Failed to list sets")?;

    if args.json {
        return output::json(&sets);
    }
    sets.iter().for_each(output::set_line);
    Ok(())
}
