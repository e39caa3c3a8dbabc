use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use fare_core::comparison::{savings_versus, ComparisonRequest, FareComparator};
use fare_core::config::PricingConfig;
use fare_core::discount::DiscountPolicy;
use fare_core::distance::matrix::DistanceMatrixClient;
use fare_core::distance::{DistanceLookup, TripQuery};
use fare_core::presentation::{format_cost, render_line};
use fare_core::ranking::{RankedResult, SortCriterion};
use fare_core::VehicleClass;
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "fare",
    about = "Compare ride fares across providers",
    long_about = "Estimates, discounts and ranks ride fares for a trip using a\n\
                  TOML pricing table. Distance can be given directly or looked up."
)]
struct Cli {
    /// Pricing table; built-in tariffs are used when omitted
    #[arg(long, global = true, env = "FARE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every configured ride for a trip
    Compare(CompareArgs),
    /// Validate a pricing table and print a summary
    CheckConfig,
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// Trip distance in kilometres
    #[arg(long, conflicts_with_all = ["pickup", "drop"])]
    distance: Option<f64>,
    /// Pickup place (looked up through the Distance Matrix API)
    #[arg(long, requires = "drop")]
    pickup: Option<String>,
    /// Drop place
    #[arg(long, requires = "pickup")]
    drop: Option<String>,
    /// Intermediate stop; repeat for several
    #[arg(long = "stop")]
    stops: Vec<String>,
    /// Sort by cost or time
    #[arg(long, default_value = "cost")]
    sort: SortCriterion,
    /// Vehicle class to list first
    #[arg(long)]
    prefer: Option<VehicleClass>,
    /// Explicit discount fraction in [0, 1); overrides the step tiers
    #[arg(long, conflicts_with = "steps")]
    discount: Option<f64>,
    /// Today's step count, used to pick a discount tier
    #[arg(long)]
    steps: Option<u32>,
    /// Whether the rider holds a commuter pass
    #[arg(long)]
    commuter_pass: bool,
    /// Print the ranked result as JSON
    #[arg(long)]
    json: bool,
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

// ── helpers ────────────────────────────────────────────────────────

fn load_config(path: Option<&PathBuf>) -> Result<PricingConfig> {
    match path {
        Some(path) => PricingConfig::from_path(path)
            .with_context(|| format!("loading pricing table {}", path.display())),
        None => Ok(PricingConfig::default()),
    }
}

fn resolve_distance(args: &CompareArgs) -> Result<f64> {
    if let Some(distance) = args.distance {
        return Ok(distance);
    }
    let (Some(pickup), Some(drop)) = (&args.pickup, &args.drop) else {
        bail!("either --distance or --pickup/--drop is required");
    };
    let Some(api_key) = args.api_key.as_deref() else {
        bail!("GOOGLE_MAPS_API_KEY must be set to look up distances");
    };

    let query = TripQuery {
        pickup: pickup.clone(),
        drop: drop.clone(),
        stops: args.stops.clone(),
    };
    let client = DistanceMatrixClient::new(api_key)?;
    let trip = client.lookup(&query)?;
    info!(
        distance_km = trip.distance_km,
        duration = %trip.duration_text,
        "looked up trip distance"
    );
    Ok(trip.distance_km)
}

fn build_request(args: &CompareArgs, distance_km: f64, policy: &dyn DiscountPolicy) -> ComparisonRequest {
    let mut request = ComparisonRequest::new(distance_km).with_sort_criterion(args.sort);
    if let Some(class) = args.prefer {
        request = request.with_preferred_class(class);
    }
    match (args.discount, args.steps) {
        (Some(fraction), _) => request.with_discount_fraction(fraction),
        (None, Some(steps)) => request.with_activity_discount(policy, steps, args.commuter_pass),
        (None, None) => request,
    }
}

fn print_ranked(ranked: &RankedResult) {
    let Some(top) = ranked.top() else {
        println!("No rides available for this trip.");
        for estimate in ranked.unavailable() {
            println!("   {}", render_line(estimate));
        }
        return;
    };

    for (index, estimate) in ranked.iter().enumerate() {
        let marker = if index == 0 { "*" } else { " " };
        println!("{marker}  {}", render_line(estimate));
    }

    println!("\nMost efficient: {}", top.summary());
    if let Some(priciest) = ranked
        .available()
        .iter()
        .max_by(|a, b| a.cost.total_cmp(&b.cost))
    {
        let saved = savings_versus(top, priciest);
        if saved > 0.0 {
            println!(
                "You save {} by taking the {} instead of {}.",
                format_cost(saved),
                top.summary(),
                priciest.summary()
            );
        }
    }
}

// ── commands ───────────────────────────────────────────────────────

fn run_compare(config: PricingConfig, args: &CompareArgs) -> Result<()> {
    let distance_km = resolve_distance(args)?;
    let request = build_request(args, distance_km, &config.discount);
    let comparator = FareComparator::new(config)?;
    let ranked = comparator.compare(&request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked.into_vec())?);
    } else {
        println!(
            "{} rides for {distance_km:.1} km (sorted by {:?}, {:.0}% off)\n",
            ranked.len(),
            request.sort_criterion,
            request.discount_fraction * 100.0
        );
        print_ranked(&ranked);
    }
    Ok(())
}

fn run_check_config(config: &PricingConfig) {
    println!("{} pricing rules", config.rules.len());
    for entry in &config.rules {
        println!(
            "  {} {}: base {} + {}/km at {} km/h",
            entry.provider,
            entry.vehicle_class,
            entry.rule.base_fare,
            entry.rule.per_km_rate,
            entry.rule.average_speed_kmh
        );
    }
    for class in VehicleClass::ALL {
        match config.distance_limits.limit_for(class) {
            Some(max_km) => println!("  {class} limited to {max_km} km"),
            None => println!("  {class} unlimited"),
        }
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Compare(args) => run_compare(config, &args)?,
        Commands::CheckConfig => run_check_config(&config),
    }
    Ok(())
}
