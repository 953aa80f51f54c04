//! `reservo` CLI — check reservation availability from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Is entity 1 free on a given day?
//! reservo check-date 2024-03-06
//!
//! # Conflicts and free periods for a range (end date exclusive)
//! reservo check-range --entity 7 2024-03-01 2024-03-15
//!
//! # Call a tool by name with JSON arguments (stdin or -i)
//! echo '{"date":"2024-03-06"}' | reservo call check_date_availability
//!
//! # Point at a different backend, or run offline against a JSON fixture
//! reservo --backend-url http://bookings.internal:3001 check-date 2024-03-06
//! reservo --fixture reservations.json check-range 2024-03-01 2024-03-15
//! ```
//!
//! Output is always JSON on stdout. Logs go to stderr.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reservo_engine::tools::{self, ToolResponse};
use reservo_engine::{AvailabilityEngine, EngineConfig, HttpSource, InMemorySource, ReservationSource};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reservo",
    version,
    about = "Reservation availability checks for bookable entities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (backend_url, default_entity_id, timeout_seconds)
    #[arg(long, global = true, env = "RESERVO_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured backend URL
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Serve reservations from a JSON fixture instead of the backend
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a single date is free
    CheckDate {
        /// Entity to check (defaults to the configured entity)
        #[arg(short, long)]
        entity: Option<String>,
        /// Date in YYYY-MM-DD format
        date: String,
    },
    /// List conflicts and free periods in [START, END)
    CheckRange {
        /// Entity to check (defaults to the configured entity)
        #[arg(short, long)]
        entity: Option<String>,
        /// First day of the range, YYYY-MM-DD
        start: String,
        /// Day after the last day of the range, YYYY-MM-DD
        end: String,
    },
    /// Invoke a tool by name with a JSON object of arguments
    Call {
        /// check_date_availability or check_date_range_availability
        tool: String,
        /// JSON arguments file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.backend_url.as_deref())?;
    tracing::debug!(
        backend_url = %config.base_url(),
        default_entity = %config.default_entity_id,
        fixture = ?cli.fixture,
        "configuration loaded"
    );
    let source: Arc<dyn ReservationSource> = match &cli.fixture {
        Some(path) => Arc::new(
            InMemorySource::from_path(path)
                .with_context(|| format!("Failed to load fixture: {}", path.display()))?,
        ),
        None => Arc::new(HttpSource::new(&config).context("Failed to build HTTP client")?),
    };
    let engine = AvailabilityEngine::new(source);
    let default_entity = config.default_entity_id.as_str();

    let response = match cli.command {
        Commands::CheckDate { entity, date } => {
            let entity = entity.as_deref().unwrap_or(default_entity);
            tools::check_date_availability(&engine, entity, &date).await
        }
        Commands::CheckRange { entity, start, end } => {
            let entity = entity.as_deref().unwrap_or(default_entity);
            tools::check_date_range_availability(&engine, entity, &start, &end).await
        }
        Commands::Call { tool, input } => {
            let raw = read_input(input.as_deref())?;
            let args: serde_json::Value =
                serde_json::from_str(&raw).context("Tool arguments must be a JSON object")?;
            tools::dispatch(&engine, &tool, &args, default_entity).await
        }
    };

    print_response(&response)?;
    if response.is_error() {
        process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Config comes from `--config`/`RESERVO_CONFIG` if given, else defaults.
/// `--backend-url` wins over both.
fn load_config(path: Option<&std::path::Path>, backend_url: Option<&str>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(url) = backend_url {
        config.backend_url = url.to_string();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_response(response: &ToolResponse) -> Result<()> {
    let pretty = serde_json::to_string_pretty(&response.to_json())?;
    println!("{}", pretty);
    Ok(())
}
