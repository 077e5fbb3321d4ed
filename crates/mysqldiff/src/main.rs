//! mysqldiff CLI
//!
//! Prints the DDL that turns the `dst` schema into the `src` schema.

use std::io;

use clap::Parser;
use tracing::{Level, warn};
use tracing_subscriber::FmtSubscriber;

use mysqldiff::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so stdout stays a clean script
    let log_level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let diff = compare(&config).await?;

    for warning in &diff.warnings {
        warn!("{warning}");
    }

    let mut out = io::stdout().lock();
    write_diff(&mut out, &diff, config.format)?;

    Ok(())
}
