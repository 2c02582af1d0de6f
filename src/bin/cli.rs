//! crous-watch CLI
//!
//! Runs a single check to completion; invocation cadence is left to an
//! external scheduler such as cron.

use std::path::PathBuf;

use clap::Parser;
use crous_watch::{
    error::Result,
    models::Config,
    pipeline::{self, DeliveryStatus},
    services::TelegramNotifier,
    storage::LocalSnapshotStore,
};

/// crous-watch - Crous housing listing watcher
#[derive(Parser, Debug)]
#[command(
    name = "crous-watch",
    version,
    about = "Watches Crous housing listings and alerts on new entries"
)]
struct Cli {
    /// Path to the snapshot file holding the last-seen listings
    #[arg(short, long, default_value = "previous_listings.json")]
    snapshot_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("crous-watch starting...");

    let config = Config::from_env()?;
    let store = LocalSnapshotStore::new(&cli.snapshot_file);
    let notifier = TelegramNotifier::new(&config)?;

    let outcome = pipeline::run_check(&config, &store, &notifier).await?;

    match &outcome.delivery {
        DeliveryStatus::Sent => log::info!("Telegram message sent successfully"),
        DeliveryStatus::Failed(reason) => log::error!("Telegram delivery failed: {reason}"),
        DeliveryStatus::Skipped => {}
    }

    log::info!(
        "Run complete: {} listings, new: {}, took {}ms",
        outcome.listing_count,
        outcome.has_new,
        (outcome.finished_at - outcome.started_at).num_milliseconds()
    );

    Ok(())
}
