use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::PropertyFilter;
use database::{connect, DbRepository, PriceConjunction, PropertySearch};
use rust_decimal::Decimal;

/// The main entry point for the LightBnB application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::ShowQuery(args) => handle_show_query(args),
        Commands::Serve => {
            let config = configuration::load_config()?;
            let _guard = configuration::init_tracing(&config.logging)?;
            web_server::run_server(config).await
        }
        Commands::Search(args) => {
            let config = configuration::load_config()?;
            let _guard = configuration::init_tracing(&config.logging)?;
            handle_search(args, &config).await
        }
        Commands::Reservations(args) => {
            let config = configuration::load_config()?;
            let _guard = configuration::init_tracing(&config.logging)?;
            handle_reservations(args, &config).await
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Property search and account service for LightBnB.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve,
    /// Search properties and print them as a table.
    Search(SearchArgs),
    /// List a guest's past reservations.
    Reservations(ReservationArgs),
    /// Print the statement and parameters a search would run, without a database.
    ShowQuery(SearchArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// Partial, case-insensitive city name.
    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    owner_id: Option<i32>,

    /// Lower nightly price bound in cents. Ignored unless --max-price is also given.
    #[arg(long)]
    min_price: Option<i64>,

    /// Upper nightly price bound in cents. Ignored unless --min-price is also given.
    #[arg(long)]
    max_price: Option<i64>,

    /// Minimum average review rating.
    #[arg(long)]
    min_rating: Option<Decimal>,
}

impl From<FilterArgs> for PropertyFilter {
    fn from(args: FilterArgs) -> Self {
        PropertyFilter {
            city: args.city,
            owner_id: args.owner_id,
            minimum_price_per_night: args.min_price,
            maximum_price_per_night: args.max_price,
            minimum_rating: args.min_rating,
        }
    }
}

#[derive(Args)]
struct SearchArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Maximum number of rows. Defaults to `search.default_limit`.
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,

    /// Join the price range with a bare AND, as older releases did.
    #[arg(long)]
    legacy_price_conjunction: bool,
}

#[derive(Args)]
struct ReservationArgs {
    #[arg(long)]
    guest_id: i32,

    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    limit: Option<i64>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_show_query(args: SearchArgs) -> anyhow::Result<()> {
    let filter = PropertyFilter::from(args.filter);
    let mut search = PropertySearch::new(&filter).price_conjunction(
        PriceConjunction::from_legacy_flag(args.legacy_price_conjunction),
    );
    if let Some(limit) = args.limit {
        search = search.limit(limit);
    }
    let query = search.build()?;

    println!("{}", query.sql);
    for (index, param) in query.params.iter().enumerate() {
        println!("${} = {:?}", index + 1, param);
    }
    Ok(())
}

async fn handle_search(args: SearchArgs, config: &Config) -> anyhow::Result<()> {
    let legacy = args.legacy_price_conjunction || config.search.legacy_price_conjunction;
    let repo = DbRepository::new(connect(&config.database).await?)
        .with_price_conjunction(PriceConjunction::from_legacy_flag(legacy));
    let limit = args.limit.unwrap_or(config.search.default_limit);
    let filter = PropertyFilter::from(args.filter);

    let listings = repo
        .search_properties(&filter, limit)
        .await
        .context("property search failed")?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "City", "Owner", "Cost/night", "Avg rating"]);
    for listing in &listings {
        let property = &listing.property;
        table.add_row(vec![
            property.id.to_string(),
            property.title.clone(),
            property.city.clone(),
            property.owner_id.to_string(),
            format!("{:.2}", f64::from(property.cost_per_night) / 100.0),
            listing
                .average_rating
                .map(|rating| rating.round_dp(2).to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    println!("{} result(s)", listings.len());
    Ok(())
}

async fn handle_reservations(args: ReservationArgs, config: &Config) -> anyhow::Result<()> {
    let repo = DbRepository::new(connect(&config.database).await?);
    let limit = args.limit.unwrap_or(config.search.default_limit);

    let reservations = repo
        .list_reservations_for_guest(args.guest_id, limit)
        .await
        .context("reservation listing failed")?;

    println!("{}", serde_json::to_string_pretty(&reservations)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_must_be_positive() {
        for limit in ["0", "-5"] {
            assert!(Cli::try_parse_from(["lightbnb", "search", "--limit", limit]).is_err());
            assert!(
                Cli::try_parse_from(["lightbnb", "reservations", "--guest-id", "1", "--limit", limit])
                    .is_err()
            );
        }

        let cli = Cli::try_parse_from(["lightbnb", "show-query", "--limit", "3"]).unwrap();
        let Commands::ShowQuery(args) = cli.command else {
            panic!("expected show-query");
        };
        assert_eq!(args.limit, Some(3));
    }
}
