//! Collection subcommand implementations.
//!
//! These work on the local store directly, without going through the HTTP
//! API, and share its validation rules.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use uuid::Uuid;

use cardvault_core::collection::{
    AddEntryRequest, CollectionParams, CollectionQuery, UpdateEntryRequest, add_card,
    collection_stats, search_collection,
};
use cardvault_core::{CollectionStore, UserId};

use crate::config::Settings;
use crate::output;

#[derive(Args, Debug)]
pub struct CollectionCommand {
    /// Collection owner
    #[arg(long, short, global = true, default_value = "local")]
    pub user: String,

    #[command(subcommand)]
    pub command: CollectionSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum CollectionSubcommand {
    /// Add copies of a card
    Add(AddArgs),

    /// List and filter owned cards
    List(ListArgs),

    /// Change an entry
    Update(UpdateArgs),

    /// Remove an entry
    Remove(RemoveArgs),

    /// Summarize the collection
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Card id
    pub scryfall_id: String,

    #[arg(long, short)]
    pub quantity: Option<i64>,

    /// mint, near_mint, excellent, good, light_played, played or poor
    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long)]
    pub foil: bool,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Name or notes contains
    #[arg(long)]
    pub q: Option<String>,

    /// Colors (comma separated)
    #[arg(long)]
    pub colors: Option<String>,

    /// Type line contains any of (comma separated)
    #[arg(long)]
    pub types: Option<String>,

    /// Set codes (comma separated)
    #[arg(long)]
    pub sets: Option<String>,

    #[arg(long)]
    pub cmc_min: Option<String>,

    #[arg(long)]
    pub cmc_max: Option<String>,

    /// Rarities (comma separated)
    #[arg(long)]
    pub rarity: Option<String>,

    /// name, cmc, rarity, set or created_at
    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,

    #[arg(long)]
    pub page: Option<String>,

    #[arg(long)]
    pub limit: Option<String>,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Entry id
    pub id: String,

    #[arg(long, short)]
    pub quantity: Option<i64>,

    #[arg(long)]
    pub condition: Option<String>,

    #[arg(long)]
    pub foil: Option<bool>,

    /// New notes; an empty string clears them
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Entry id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub async fn handle(cmd: CollectionCommand, settings: Settings) -> Result<()> {
    let user = UserId::new(cmd.user.as_str()).context("Invalid user id")?;

    match cmd.command {
        CollectionSubcommand::Add(args) => add(args, &user, &settings).await,
        CollectionSubcommand::List(args) => list(args, &user, &settings).await,
        CollectionSubcommand::Update(args) => update(args, &user, &settings).await,
        CollectionSubcommand::Remove(args) => remove(args, &user, &settings).await,
        CollectionSubcommand::Stats(args) => stats(args, &user, &settings).await,
    }
}

fn entry_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("'{}' is not a valid entry id", raw))
}

async fn add(args: AddArgs, user: &UserId, settings: &Settings) -> Result<()> {
    let new = AddEntryRequest {
        scryfall_id: Some(args.scryfall_id),
        quantity: args.quantity,
        condition: args.condition,
        foil: Some(args.foil),
        notes: args.notes,
    }
    .validate()?;

    let gateway = settings.gateway()?;
    let store = settings.store()?;
    let outcome = add_card(&gateway, &store, user, new)
        .await
        .context("Failed to add card")?;

    let verb = if outcome.merged { "Merged into" } else { "Created" };
    output::success(&format!("{} entry {}", verb, outcome.entry.id));
    output::field("Quantity", &outcome.entry.quantity.to_string());
    output::field("Condition", outcome.entry.condition.as_str());
    output::field("Foil", &outcome.entry.foil.to_string());
    Ok(())
}

async fn list(args: ListArgs, user: &UserId, settings: &Settings) -> Result<()> {
    let params = CollectionParams {
        q: args.q,
        colors: args.colors,
        types: args.types,
        sets: args.sets,
        cmc_min: args.cmc_min,
        cmc_max: args.cmc_max,
        rarity: args.rarity,
        sort: args.sort,
        order: args.order,
        page: args.page,
        limit: args.limit,
    };
    let query = CollectionQuery::from_params(&params)?;
    let store = settings.store()?;
    let page = search_collection(&store, user, &query).await?;

    if args.json {
        return output::json_pretty(&page);
    }

    if page.data.is_empty() {
        eprintln!("{}", "No cards found.".dimmed());
        return Ok(());
    }
    page.data.iter().for_each(output::entry_line);
    eprintln!();
    eprintln!(
        "{}: {} of {} (page {})",
        "Showing".dimmed(),
        page.data.len(),
        page.total,
        page.page
    );
    if page.has_more {
        output::next_page(page.page);
    }
    Ok(())
}

async fn update(args: UpdateArgs, user: &UserId, settings: &Settings) -> Result<()> {
    let id = entry_id(&args.id)?;
    let update = UpdateEntryRequest {
        quantity: args.quantity,
        condition: args.condition,
        foil: args.foil,
        notes: args.notes,
    }
    .validate()?;

    let entry = settings.store()?.update_entry(user, id, update).await?;
    output::success(&format!("Updated entry {}", entry.id));
    output::json_pretty(&entry)
}

async fn remove(args: RemoveArgs, user: &UserId, settings: &Settings) -> Result<()> {
    let id = entry_id(&args.id)?;
    settings.store()?.remove_entry(user, id).await?;
    output::success(&format!("Removed entry {}", id));
    Ok(())
}

async fn stats(args: StatsArgs, user: &UserId, settings: &Settings) -> Result<()> {
    let stats = collection_stats(&settings.store()?, user).await?;
    if args.pretty {
        output::json_pretty(&stats)
    } else {
        output::json(&stats)
    }
}
