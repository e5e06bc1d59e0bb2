//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Waits and delays used while driving the browser.
///
/// Not exposed on the command line; the defaults mirror what the target site
/// needs. Library users (and tests) can shorten them.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Bound for the DOM-loaded and network-quiet wait.
    pub settle_timeout: Duration,
    /// Fixed delay after a navigation has settled.
    pub settle_delay: Duration,
    /// Fixed delay after a pagination click has settled.
    pub page_advance_delay: Duration,
    /// Fixed delay between navigation attempts.
    pub retry_backoff: Duration,
    /// Wait for listing entries after opening a category.
    pub listing_wait: Duration,
    /// Extra delay when listing entries did not show up in time.
    pub listing_grace_delay: Duration,
    /// Per-selector wait on detail pages.
    pub detail_selector_timeout: Duration,
    /// Delay between consecutive detail fetches.
    pub detail_request_delay: Duration,
    /// Snapshot polling interval while waiting for a selector.
    pub poll_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_timeout: SETTLE_TIMEOUT,
            settle_delay: SETTLE_DELAY,
            page_advance_delay: PAGE_ADVANCE_DELAY,
            retry_backoff: NAVIGATION_RETRY_BACKOFF,
            listing_wait: LISTING_WAIT_TIMEOUT,
            listing_grace_delay: LISTING_GRACE_DELAY,
            detail_selector_timeout: DETAIL_SELECTOR_TIMEOUT,
            detail_request_delay: DETAIL_REQUEST_DELAY,
            poll_interval: SELECTOR_POLL_INTERVAL,
        }
    }
}

/// Command-line options and library configuration.
///
/// Parsed by `clap` in the binary; library users construct it directly and
/// override only what they need.
///
/// # Examples
///
/// ```bash
/// # Two categories, every agency, no browser window
/// agency_directory -c 종합광고대행사 페이스북 -n 0 --headless
///
/// # Listing pages only, results under ./out
/// agency_directory --skip-details --output-dir ./out
/// ```
///
/// ```no_run
/// use agency_directory::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     categories: vec!["페이스북".to_string()],
///     max_agencies_per_category: 0,
///     output_dir: PathBuf::from("./out"),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "agency_directory",
    about = "Scrapes the i-boss agency directory into SQLite and CSV."
)]
pub struct Config {
    /// Categories to scrape (exact names as shown on the directory page)
    #[arg(short = 'c', long = "categories", num_args = 1.., default_values_t = DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect::<Vec<_>>())]
    pub categories: Vec<String>,

    /// Maximum number of agencies to scrape per category (0 for all)
    #[arg(short = 'n', long = "num-agencies", default_value_t = DEFAULT_AGENCIES_PER_CATEGORY)]
    pub max_agencies_per_category: usize,

    /// Run the browser in headless mode
    #[arg(long)]
    pub headless: bool,

    /// Skip scraping detailed descriptions
    #[arg(long)]
    pub skip_details: bool,

    /// SQLite file name; the file is placed inside the output directory
    #[arg(long, value_parser, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Directory for the database, CSV files and logos
    #[arg(long, value_parser, default_value = ".")]
    pub output_dir: PathBuf,

    /// WebDriver endpoint (chromedriver, geckodriver, ...)
    #[arg(long, default_value = DEFAULT_WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Origin that relative directory links are resolved against
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Walk categories again even if a previous run finished them
    #[arg(long)]
    pub rescrape: bool,

    /// Do not open a browser; only export the existing database to CSV
    #[arg(long)]
    pub export_only: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Browser waits and delays
    #[arg(skip)]
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            max_agencies_per_category: DEFAULT_AGENCIES_PER_CATEGORY,
            headless: false,
            skip_details: false,
            db_path: PathBuf::from(DB_PATH),
            output_dir: PathBuf::from("."),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rescrape: false,
            export_only: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timing: Timing::default(),
        }
    }
}

impl Config {
    /// Location of the SQLite file: the file name of `db_path` inside `output_dir`.
    pub fn resolved_db_path(&self) -> PathBuf {
        match self.db_path.file_name() {
            Some(name) => self.output_dir.join(name),
            None => self.output_dir.join(DB_PATH.trim_start_matches("./")),
        }
    }

    /// Directory that receives downloaded logos.
    pub fn logos_dir(&self) -> PathBuf {
        self.output_dir.join(LOGOS_DIR_NAME)
    }

    /// Per-category cap, `None` when unlimited.
    pub fn agency_cap(&self) -> Option<usize> {
        (self.max_agencies_per_category > 0).then_some(self.max_agencies_per_category)
    }
}
