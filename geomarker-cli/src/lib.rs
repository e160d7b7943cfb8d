//! Command-line interface for the geomarker crawler.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use geomarker_crawler::CancellationToken;

mod crawl;
mod error;
mod logging;

use crawl::{CrawlArgs, run_crawl};
pub use error::{CliError, EXIT_CANCELLED, EXIT_FAILURE};

const ARG_CRAWL_LISTING_TIMEOUT: &str = "listing-timeout-secs";
const ARG_CRAWL_LOOKUP_TIMEOUT: &str = "lookup-timeout-secs";
const ARG_CRAWL_WRITE_WORKERS: &str = "write-workers";
const ARG_CRAWL_QUEUE_CAPACITY: &str = "queue-capacity";
const ARG_CRAWL_SQLITE: &str = "sqlite";
const ARG_CRAWL_DB_HOST: &str = "db-host";
const ARG_CRAWL_DB_USER: &str = "db-user";
const ARG_CRAWL_DB_NAME: &str = "db-name";
const ENV_CRAWL_DB_USER: &str = "GEOMARKER_CMDS_CRAWL_DB_USER";
const ENV_CRAWL_DB_NAME: &str = "GEOMARKER_CMDS_CRAWL_DB_NAME";

/// Run the geomarker CLI with the current process arguments and environment.
///
/// Ctrl-C cancels the crawl; queued writes are drained before this returns.
///
/// # Errors
///
/// Returns [`CliError`] for invalid configuration, an unreachable store, or a
/// crawl that stopped early. [`CliError::exit_code`] maps it to a status.
pub async fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    logging::init_logging()?;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    match cli.command {
        Command::Crawl(args) => {
            run_crawl(args, cancel).await?;
        }
    }
    Ok(())
}

fn cancel_on_interrupt(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::warn!("interrupt received; finishing queued writes");
                cancel.cancel();
            }
            Err(err) => log::warn!("Ctrl-C handler unavailable: {err}"),
        }
    });
}

#[derive(Debug, Parser)]
#[command(
    name = "geomarker",
    about = "Harvest Wikipedia article coordinates into a spatial database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk the article listing and upsert a marker per located article.
    Crawl(CrawlArgs),
}

#[cfg(test)]
mod tests;
