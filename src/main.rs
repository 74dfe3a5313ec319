//! Catalog-Harvest main entry point
//!
//! Running the binary performs exactly one full crawl-and-load pass.

use anyhow::Context;
use catalog_harvest::config::load_config;
use catalog_harvest::crawler::crawl;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: crawl a paginated catalog and load it into a database
///
/// Store and crawler settings are read from the environment (and a `.env`
/// file if present): POSTGRES_USER, POSTGRES_PASSWORD, POSTGRES_HOST,
/// POSTGRES_PORT, POSTGRES_DB, or CATALOG_SQLITE_PATH for a local SQLite file.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a paginated catalog into a relational store", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context("loading configuration");
        }
    };
    tracing::info!(
        "Starting crawl at {} with {} workers",
        config.crawler.start_url,
        config.crawler.workers
    );

    match crawl(config).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {} of {} pages loaded, {} new rows",
                summary.pages_done,
                summary.pages_discovered,
                summary.rows_inserted
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl aborted: {}", e);
            Err(e).context("running crawl")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, overrides the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("catalog_harvest=info,warn"),
                1 => EnvFilter::new("catalog_harvest=debug,info"),
                _ => EnvFilter::new("catalog_harvest=trace,debug"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
