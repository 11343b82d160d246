//! Serve command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use cardvault_server::AppState;

use crate::config::Settings;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub listen: Option<String>,
}

pub async fn run(args: ServeArgs, settings: Settings) -> Result<()> {
    let listen = args.listen.unwrap_or_else(|| settings.listen.clone());

    let tokens = settings.token_map()?;
    if tokens.is_empty() {
        warn!("no API tokens configured, every API request will be rejected");
    }

    let data_dir = settings.data_dir()?;
    info!(data_dir = %data_dir.display(), scryfall = %settings.scryfall_url, "starting");

    let state = AppState::new(
        Arc::new(settings.gateway()?),
        Arc::new(settings.store()?),
        tokens,
    );

    cardvault_server::serve(state, &listen)
        .await
        .with_context(|| format!("Server on {} failed", listen))
}
