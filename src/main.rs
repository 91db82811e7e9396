//! Flight turnaround CLI
//!
//! Fetches an airport's departures and arrivals for two windows and lists the
//! airports that appear on both sides.

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use turnaround::{
    client::{ClientConfig, FlightClient, TimeWindow, DEFAULT_BASE_URL},
    comparison::{Comparison, ComparisonConfig},
    correlate, protocol, report,
    types::{Direction, FlightRecord},
};

#[derive(Parser)]
#[command(name = "turnaround")]
#[command(about = "Finds airports served by both departures and arrivals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both windows and report airports present in both
    Compare {
        /// IATA code of the airport to query
        #[arg(short, long, default_value = "OSL")]
        airport: String,

        /// Start of the departure window (RFC 3339)
        #[arg(long, default_value = "2019-10-04T05:00:00+01:00")]
        departures_from: DateTime<FixedOffset>,

        /// End of the departure window (RFC 3339)
        #[arg(long, default_value = "2019-10-04T10:00:00+01:00")]
        departures_to: DateTime<FixedOffset>,

        /// Start of the arrival window (RFC 3339)
        #[arg(long, default_value = "2019-10-06T13:00:00+01:00")]
        arrivals_from: DateTime<FixedOffset>,

        /// End of the arrival window (RFC 3339)
        #[arg(long, default_value = "2019-10-06T19:00:00+01:00")]
        arrivals_to: DateTime<FixedOffset>,

        /// Base URL of the flight API
        #[arg(long, env = "AVINOR_BASE_URL", default_value = DEFAULT_BASE_URL)]
        base_url: String,

        /// Request timeout in seconds
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    /// Parse a saved flight list (for testing)
    Parse {
        /// Path to a JSON response
        file: PathBuf,

        /// Direction the file was fetched with
        #[arg(long, value_enum, default_value = "departure")]
        direction: DirectionArg,
    },

    /// Correlate two saved flight lists without fetching
    Correlate {
        /// Path to a saved departures response
        departures: PathBuf,

        /// Path to a saved arrivals response
        arrivals: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum DirectionArg {
    Departure,
    Arrival,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Departure => Direction::Departure,
            DirectionArg::Arrival => Direction::Arrival,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Compare {
            airport,
            departures_from,
            departures_to,
            arrivals_from,
            arrivals_to,
            base_url,
            timeout,
        } => {
            let config = ComparisonConfig {
                airport,
                departures: TimeWindow::new(departures_from, departures_to),
                arrivals: TimeWindow::new(arrivals_from, arrivals_to),
            };
            run_compare(config, base_url, timeout).await?;
        }

        Commands::Parse { file, direction } => {
            parse_file(&file, direction.into())?;
        }

        Commands::Correlate {
            departures,
            arrivals,
        } => {
            correlate_files(&departures, &arrivals)?;
        }
    }

    Ok(())
}

async fn run_compare(
    config: ComparisonConfig,
    base_url: String,
    timeout: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Base URL: {}", base_url);
    tracing::info!("Timeout: {}s", timeout);

    let client_config = ClientConfig::new()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(timeout));
    let client = FlightClient::new(client_config)?;

    println!("Comparing departures vs arrivals");

    let outcome = Comparison::new(client, config).run().await?;

    print!("{}", report::render_departures(&outcome));
    print!("{}", report::render_correlation(&outcome.correlation()));

    Ok(())
}

fn read_flights(path: &PathBuf) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;

    tracing::info!("Parsing file: {} ({} bytes)", path.display(), data.len());

    Ok(protocol::parse_flights(&data)?)
}

fn parse_file(path: &PathBuf, direction: Direction) -> Result<(), Box<dyn std::error::Error>> {
    let flights = read_flights(path)?;

    println!("Parsed {} flights", flights.len());
    println!();

    for flight in &flights {
        println!("{}", flight.display(direction));
    }

    let grouping = correlate::group(&flights, direction.key_rule());
    let mut codes: Vec<_> = grouping.iter().collect();
    codes.sort_unstable_by_key(|(code, _)| *code);

    println!();
    println!("{} airports:", grouping.len());
    for (code, group) in codes {
        println!("  {}: {}", code, group.len());
    }

    Ok(())
}

fn correlate_files(
    departures_path: &PathBuf,
    arrivals_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let departures = read_flights(departures_path)?;
    let arrivals = read_flights(arrivals_path)?;

    let departure_grouping = correlate::group(&departures, Direction::Departure.key_rule());
    let arrival_grouping = correlate::group(&arrivals, Direction::Arrival.key_rule());

    println!(
        "{} departures to {} airports, {} arrivals from {} airports",
        departures.len(),
        departure_grouping.len(),
        arrivals.len(),
        arrival_grouping.len()
    );
    println!();

    print!(
        "{}",
        report::render_correlation(&correlate::correlate(&departure_grouping, &arrival_grouping))
    );

    Ok(())
}
