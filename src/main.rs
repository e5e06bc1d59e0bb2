//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `agency_directory` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use agency_directory::initialization::init_logger_with;
use agency_directory::{run_export, run_scrape, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    if config.export_only {
        return match run_export(&config).await {
            Ok(summary) => {
                println!(
                    "✅ Exported {} categories, {} agencies and {} sessions to {}",
                    summary.categories,
                    summary.agencies,
                    summary.sessions,
                    config.output_dir.display()
                );
                Ok(())
            }
            Err(e) => {
                eprintln!("agency_directory error: {:#}", e);
                process::exit(1);
            }
        };
    }

    match run_scrape(config).await {
        Ok(report) if report.succeeded() => {
            let session = &report.session;
            println!(
                "✅ Session {} completed in {:.1}s: {}/{} categories, {}/{} agencies, {}/{} details",
                session.id,
                report.elapsed_seconds,
                session.categories_scraped,
                session.categories_total,
                session.agencies_scraped,
                session.agencies_total,
                session.details_scraped,
                session.details_total
            );
            Ok(())
        }
        Ok(report) => {
            eprintln!(
                "agency_directory: session {} failed: {}",
                report.session.id,
                report.failure.as_deref().unwrap_or("unknown error")
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("agency_directory error: {:#}", e);
            process::exit(1);
        }
    }
}
