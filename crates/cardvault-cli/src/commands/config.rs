//! Config command implementation.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective settings as JSON
    Show,

    /// Print the data directory
    DataDir,
}

pub fn handle(cmd: ConfigCommand, settings: Settings) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => {
            let mut shown = settings.clone();
            shown.data_dir = Some(settings.data_dir()?);
            output::json_pretty(&shown)
        }
        ConfigSubcommand::DataDir => {
            println!("{}", settings.data_dir()?.display());
            Ok(())
        }
    }
}
