//! agency_directory library: resumable scraping of the i-boss agency directory
//!
//! This library drives a browser through the directory's three levels
//! (categories, paginated agency listings, agency detail pages), stores
//! everything in SQLite as it goes and exports the store to CSV. Finished
//! categories and detailed agencies are remembered, so a new run picks up
//! where the last one stopped.
//!
//! # Example
//!
//! ```no_run
//! use agency_directory::{run_scrape, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     categories: vec!["페이스북".to_string()],
//!     max_agencies_per_category: 0,
//!     headless: true,
//!     ..Default::default()
//! };
//!
//! let report = run_scrape(config).await?;
//! println!(
//!     "Session {}: {} agencies, {} details",
//!     report.session.id, report.session.agencies_scraped, report.session.details_scraped
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! A Tokio runtime and, for `run_scrape`, a WebDriver server (chromedriver)
//! at `Config::webdriver_url`.

pub mod browser;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod fetch;
pub mod initialization;
pub mod parse;
pub mod storage;
mod run;
mod utils;

// Re-export public API
pub use browser::{ClickTarget, PageDriver, WebDriverBrowser};
pub use config::{Config, LogFormat, LogLevel, Timing};
pub use export::{export_csv, ExportSummary};
pub use run::{run_export, run_scrape, run_scrape_with, ScrapeReport, ScrapeResources, Scraper};
pub use storage::{SessionState, SessionStatus, Store};
