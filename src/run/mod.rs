//! Scraping run orchestration.
//!
//! `run_scrape` opens the store and a browser session, creates the session
//! record and runs the `Scraper`. Whatever happens (an error, an empty
//! directory, Ctrl-C) the session gets a terminal status and both resources
//! are released before it returns.

mod finalize;
mod resources;
mod scraper;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};

use crate::browser::PageDriver;
use crate::config::Config;
use crate::export::{export_csv, ExportSummary};
use crate::fetch::{Navigator, ScrapeContext};
use crate::initialization::{init_browser, init_client, init_output_dirs};
use crate::storage::{SessionState, SessionStatus, Store};

use finalize::{finalize_session, SessionEnd};
pub use resources::ScrapeResources;
pub use scraper::Scraper;

/// Results of a scraping run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Final state of the session record
    pub session: SessionState,
    /// Exported row counts; `None` unless the session completed
    pub export: Option<ExportSummary>,
    /// Why the session failed, if it did
    pub failure: Option<String>,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

impl ScrapeReport {
    pub fn succeeded(&self) -> bool {
        self.session.status == SessionStatus::Completed
    }
}

async fn open_store(config: &Config) -> Result<Store> {
    init_output_dirs(&config.output_dir, &config.logos_dir())
        .context("Failed to create output directories")?;
    let db_path = config.resolved_db_path();
    Store::open(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}

/// Runs a full scraping session with a WebDriver browser.
///
/// # Errors
///
/// Returns an error only when the store cannot be opened or the session
/// record cannot be created. Every later failure (including a WebDriver
/// server that does not answer) is recorded in the session and reported
/// through `ScrapeReport`.
pub async fn run_scrape(config: Config) -> Result<ScrapeReport> {
    let start_time = Instant::now();
    let store = open_store(&config).await?;
    let mut session = store
        .create_session()
        .await
        .context("Failed to create session record")?;
    log::info!("Started scraping session {}", session.id);

    let driver: Arc<dyn PageDriver> =
        match init_browser(&config.webdriver_url, config.headless).await {
            Ok(browser) => Arc::new(browser),
            Err(e) => {
                log::error!("Cannot start the browser: {e}");
                if let Err(e) = store.finish_session(&mut session, SessionStatus::Failed).await {
                    log::error!("Failed to record end of session {}: {e}", session.id);
                }
                store.close().await;
                return Err(anyhow!(e).context("Failed to open a WebDriver session"));
            }
        };

    drive_session(&config, ScrapeResources::new(store, driver), session, start_time).await
}

/// Runs a full scraping session over an already opened store and browser.
///
/// The store and the driver are released before this returns.
///
/// # Errors
///
/// Returns an error when the session record cannot be created.
pub async fn run_scrape_with(config: &Config, resources: ScrapeResources) -> Result<ScrapeReport> {
    let start_time = Instant::now();
    init_output_dirs(&config.output_dir, &config.logos_dir())
        .context("Failed to create output directories")?;
    let session = match resources.store.create_session().await {
        Ok(session) => session,
        Err(e) => {
            resources.release().await;
            return Err(anyhow!(e).context("Failed to create session record"));
        }
    };
    drive_session(config, resources, session, start_time).await
}

async fn drive_session(
    config: &Config,
    resources: ScrapeResources,
    mut session: SessionState,
    start_time: Instant,
) -> Result<ScrapeReport> {
    let end = match build_scraper(config, &resources) {
        Ok(scraper) => {
            tokio::select! {
                result = scraper.run(&mut session) => match result {
                    Ok(summary) => SessionEnd::Completed(summary),
                    Err(e) => SessionEnd::Failed(e),
                },
                _ = tokio::signal::ctrl_c() => SessionEnd::Interrupted,
            }
        }
        Err(e) => SessionEnd::Failed(e),
    };
    Ok(finalize_session(resources, session, end, start_time, &config.output_dir).await)
}

fn build_scraper(config: &Config, resources: &ScrapeResources) -> Result<Scraper> {
    let navigator = Navigator::new(
        resources.driver.clone(),
        &config.base_url,
        config.timing.clone(),
    )?;
    let client = init_client().context("Failed to build HTTP client")?;
    let ctx = ScrapeContext::new(
        navigator,
        resources.store.clone(),
        client,
        config.logos_dir(),
        config.output_dir.clone(),
        config.agency_cap(),
    );
    Ok(Scraper::new(ctx, config))
}

/// Exports the store at the configured path to CSV without touching a browser.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or a file cannot be written.
pub async fn run_export(config: &Config) -> Result<ExportSummary> {
    let store = open_store(config).await?;
    let result = export_csv(&store, &config.output_dir).await;
    store.close().await;
    result
}
