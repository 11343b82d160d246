//! Search command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use cardvault_core::{
    CardSearch, Color, EnrichPipeline, FormatLegality, NumericRange, Rarity, SearchFilterSpec,
    SearchOptions, SetCode, UniqueMode, UserId,
};

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query in card API syntax (e.g., "t:goblin c:r")
    pub query: Option<String>,

    /// Name contains
    #[arg(long)]
    pub name: Option<String>,

    /// Card colors (comma separated, e.g., w,u)
    #[arg(long = "color", value_delimiter = ',')]
    pub colors: Vec<Color>,

    /// Color identity (comma separated)
    #[arg(long = "identity", value_delimiter = ',')]
    pub color_identity: Vec<Color>,

    /// Type line contains (repeatable)
    #[arg(long = "type")]
    pub types: Vec<String>,

    /// Rules text contains
    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub cmc_min: Option<f64>,

    #[arg(long)]
    pub cmc_max: Option<f64>,

    /// Set codes (comma separated)
    #[arg(long = "set", value_delimiter = ',')]
    pub sets: Vec<SetCode>,

    /// Rarities (comma separated)
    #[arg(long = "rarity", value_delimiter = ',')]
    pub rarities: Vec<Rarity>,

    /// Legal in format
    #[arg(long, conflicts_with = "banned")]
    pub legal: Option<String>,

    /// Banned in format
    #[arg(long)]
    pub banned: Option<String>,

    /// Result page (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Collapse mode: cards, art or prints
    #[arg(long, default_value = "cards")]
    pub unique: UniqueMode,

    /// Mark results with this user's owned quantities
    #[arg(long)]
    pub user: Option<String>,

    /// Print the result page as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    fn filters(&self) -> SearchFilterSpec {
        let legality = match (&self.legal, &self.banned) {
            (Some(format), _) => Some(FormatLegality::Legal(format.clone())),
            (None, Some(format)) => Some(FormatLegality::Banned(format.clone())),
            (None, None) => None,
        };
        SearchFilterSpec {
            name: self.name.clone(),
            colors: self.colors.clone(),
            color_identity: self.color_identity.clone(),
            types: self.types.clone(),
            oracle_text: self.text.clone(),
            cmc: NumericRange {
                min: self.cmc_min,
                max: self.cmc_max,
            },
            sets: self.sets.clone(),
            rarities: self.rarities.clone(),
            legality,
            ..Default::default()
        }
    }
}

pub async fn run(args: SearchArgs, settings: Settings) -> Result<()> {
    if args.page == 0 {
        bail!("--page must be at least 1");
    }
    let options = SearchOptions {
        unique: args.unique,
        page: args.page,
        ..Default::default()
    };

    let gateway = settings.gateway()?;
    let filters = args.filters();

    let page = match args.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => gateway.search(q, &options).await,
        _ if !filters.is_empty() => gateway.advanced_search(&filters, &options).await,
        _ => bail!("Provide a query or at least one filter flag"),
    }
    .context("Search failed")?;

    if let Some(user) = &args.user {
        let user = UserId::new(user.as_str()).context("Invalid user id")?;
        let store = settings.store()?;
        let page = EnrichPipeline::new(&store, &store)
            .enrich_page(&user, page)
            .await;

        if args.json {
            return output::json_pretty(&page);
        }
        page.data.iter().for_each(output::enriched_line);
        footer(page.total_cards, page.has_more, args.page);
        return Ok(());
    }

    if args.json {
        return output::json_pretty(&page);
    }
    page.data.iter().for_each(output::card_line);
    footer(page.total_cards, page.has_more, args.page);
    Ok(())
}

fn footer(total: u64, has_more: bool, page: u32) {
    if total == 0 {
        eprintln!("{}", "No cards found.".dimmed());
        return;
    }
    eprintln!();
    eprintln!("{}: {}", "Total".dimmed(), total);
    if has_more {
        output::next_page(page);
    }
}
