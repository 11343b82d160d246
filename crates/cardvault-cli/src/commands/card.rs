//! Card lookup command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use cardvault_core::{Card, CardSearch, ScryfallId, SetCode};

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct CardArgs {
    /// Card id
    pub id: Option<String>,

    /// Exact card name (alternative to id)
    #[arg(long, conflicts_with = "id")]
    pub name: Option<String>,

    /// Restrict an exact name lookup to a set
    #[arg(long, requires = "name")]
    pub set: Option<String>,

    /// Match the name approximately
    #[arg(long, requires = "name", conflicts_with = "set")]
    pub fuzzy: bool,

    /// Save the card's normal-size image to this path
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: CardArgs, settings: Settings) -> Result<()> {
    let gateway = settings.gateway()?;

    let card: Card = match (&args.id, &args.name) {
        (Some(id), _) => {
            let id = ScryfallId::new(id).context("Invalid card id")?;
            gateway.get_card(&id).await
        }
        (None, Some(name)) if args.fuzzy => gateway.get_card_by_fuzzy_name(name).await,
        (None, Some(name)) => {
            let set = args
                .set
                .as_deref()
                .map(SetCode::new)
                .transpose()
                .context("Invalid set code")?;
            gateway.get_card_by_name(name, set.as_ref()).await
        }
        (None, None) => bail!("Either an id or --name is required"),
    }
    .context("Card lookup failed")?;

    if let Some(path) = &args.image {
        let url = card
            .images()
            .normal
            .context("Card has no image")?;
        let bytes = gateway
            .download_image(&url)
            .await
            .context("Failed to download image")?;
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        output::success(&format!("Saved image to {}", path.display()));
    }

    if args.pretty {
        output::json_pretty(&card)
    } else {
        output::json(&card)
    }
}
