use analytics::{AnalyticsError, InvestmentAnalyzer};
use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use configuration::Config;
use core_types::{AnalysisInput, CompetitorOrder, Listing, LocationRating};
use dataset::{DatasetCache, DatasetError, cities, filter_by_city, find_by_id};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;

mod render;

/// The main entry point for the flipscope CLI.
fn main() -> ExitCode {
    // Optional .env with FLIP__* overrides.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(hint) = recovery_hint(&e) {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Explore apartment flip opportunities: costs, profit and nearby competition.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to ./config.toml when it exists.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Listings CSV, overriding `[dataset] path` from the configuration.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the cities present in the dataset.
    Cities,
    /// List every listing in a city.
    Listings(CityArgs),
    /// Show the attributes of one listing.
    Show(SelectionArgs),
    /// Compute costs, profit, returns and nearby competitors for one listing.
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct CityArgs {
    /// The city to list (e.g., "Moscow").
    #[arg(long)]
    city: String,
}

#[derive(Args)]
struct SelectionArgs {
    /// The city the listing belongs to.
    #[arg(long)]
    city: String,

    /// The listing identifier.
    #[arg(long)]
    id: String,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Renovation cost per square metre.
    #[arg(long, allow_negative_numbers = true)]
    renovation_cost: Option<Decimal>,

    /// Flat commission paid on the deal.
    #[arg(long, allow_negative_numbers = true)]
    commission: Option<Decimal>,

    /// Discount negotiated off the entry price.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    bargain: Decimal,

    /// Project length in months, used to annualise the return.
    #[arg(long)]
    months: Option<u32>,

    /// Competitor search radius in metres.
    #[arg(long, allow_negative_numbers = true)]
    radius: Option<f64>,

    /// Order competitors nearest first instead of in dataset order.
    #[arg(long)]
    sort_by_distance: bool,

    /// A 1-10 location rating as name=score (repeatable), e.g. --rating transit=7.
    #[arg(long = "rating", value_parser = parse_rating)]
    ratings: Vec<LocationRating>,

    /// Print the full result as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let _log_guard = configuration::init_tracing(&config.logging)?;

    let source = cli.data.clone().unwrap_or_else(|| config.dataset.path.clone());
    tracing::info!(path = %source.display(), "Loading listings dataset...");
    let mut cache = DatasetCache::new();
    let listings = cache
        .get_or_load(&source, config.dataset.prediction_basis)
        .context("Cannot continue without the listings dataset")?;

    match cli.command {
        Commands::Cities => {
            tracing::info!("Dispatching 'cities' command.");
            println!("{}", render::cities_table(&cities(&listings), &listings));
        }
        Commands::Listings(args) => {
            tracing::info!(city = %args.city, "Dispatching 'listings' command.");
            let in_city = city_listings(&listings, &args.city)?;
            println!("{}", render::listings_table(&in_city));
        }
        Commands::Show(args) => {
            tracing::info!(city = %args.city, id = %args.id, "Dispatching 'show' command.");
            let in_city = city_listings(&listings, &args.city)?;
            let listing = find_by_id(in_city.iter().copied(), &args.id)?;
            println!("{}", render::listing_table(listing));
        }
        Commands::Analyze(args) => {
            tracing::info!(
                city = %args.selection.city,
                id = %args.selection.id,
                "Dispatching 'analyze' command."
            );
            handle_analyze(args, &config, &listings)?
        }
    }

    Ok(())
}

/// Builds the request from CLI flags over configured defaults and prints the result.
fn handle_analyze(args: AnalyzeArgs, config: &Config, listings: &[Listing]) -> anyhow::Result<()> {
    let defaults = &config.analysis;
    let input = AnalysisInput {
        city: args.selection.city,
        listing_id: args.selection.id,
        renovation_cost_per_area: args
            .renovation_cost
            .unwrap_or(defaults.renovation_cost_per_area),
        commission: args.commission.unwrap_or(defaults.commission),
        bargain: args.bargain,
        project_months: args.months.unwrap_or(defaults.project_months),
        radius_meters: args.radius.unwrap_or(defaults.radius_meters),
        order: if args.sort_by_distance {
            CompetitorOrder::Distance
        } else {
            CompetitorOrder::Input
        },
        location_ratings: args.ratings,
    };

    // Surface an unknown city before the lookup reports a missing listing.
    city_listings(listings, &input.city)?;

    let analyzer = InvestmentAnalyzer::new(config.taxes.clone())?;
    let result = analyzer.analyze(listings, &input)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", render::listing_table(&result.listing));
    println!("{}", render::metrics_table(&result));
    println!(
        "Competitors within {} m ({} found)",
        input.radius_meters,
        result.competitors.len()
    );
    println!("{}", render::competitors_table(&result.competitors));
    if let Some(market) = &result.market {
        println!("{}", render::market_table(market));
    }
    Ok(())
}

fn city_listings<'a>(listings: &'a [Listing], city: &str) -> anyhow::Result<Vec<&'a Listing>> {
    let in_city = filter_by_city(listings, city);
    if in_city.is_empty() {
        bail!(
            "No listings for city '{city}'. Known cities: {}",
            cities(listings).join(", ")
        );
    }
    Ok(in_city)
}

/// Parses `name=score` into a `LocationRating`.
fn parse_rating(raw: &str) -> Result<LocationRating, String> {
    let (name, score) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=score, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("rating '{raw}' has no name"));
    }
    let score = score
        .trim()
        .parse::<u8>()
        .map_err(|e| format!("rating '{raw}' has an invalid score: {e}"))?;
    Ok(LocationRating {
        name: name.to_string(),
        score,
    })
}

/// What the user can do about a recoverable error.
fn recovery_hint(error: &anyhow::Error) -> Option<&'static str> {
    let not_found = "Pick an identifier from `flipscope listings --city <CITY>` and try again.";
    let invalid = "Adjust the rejected value and run the analysis again.";

    if let Some(e) = error.downcast_ref::<AnalyticsError>() {
        return match e {
            AnalyticsError::InvalidInput(..) => Some(invalid),
            AnalyticsError::Dataset(DatasetError::NotFound { .. }) => Some(not_found),
            AnalyticsError::Dataset(DatasetError::DataUnavailable { .. }) => None,
        };
    }
    match error.downcast_ref::<DatasetError>() {
        Some(DatasetError::NotFound { .. }) => Some(not_found),
        _ => None,
    }
}
