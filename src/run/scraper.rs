//! The session sequence: discover, select, traverse, backfill details, export.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use tokio::time::sleep;

use crate::config::Config;
use crate::export::{export_csv, ExportSummary};
use crate::fetch::{discover_categories, fetch_detail, scrape_category, ScrapeContext};
use crate::storage::{Category, SessionState, Store};

/// Keeps the categories named in `targets` (exact match), in discovery order.
///
/// An empty `targets` keeps everything. Names that match nothing are logged.
pub(crate) fn select_targets(categories: Vec<Category>, targets: &[String]) -> Vec<Category> {
    if targets.is_empty() {
        return categories;
    }
    for target in targets {
        if !categories.iter().any(|c| &c.name == target) {
            warn!("Category {target:?} is not listed on the directory page");
        }
    }
    categories
        .into_iter()
        .filter(|c| targets.contains(&c.name))
        .collect()
}

/// Drops categories a previous run already finished, unless `rescrape` is set.
pub(crate) fn drop_finished(categories: Vec<Category>, rescrape: bool) -> Vec<Category> {
    if rescrape {
        return categories;
    }
    let (finished, pending): (Vec<_>, Vec<_>) = categories.into_iter().partition(|c| c.scraped);
    for category in &finished {
        info!(
            "Skipping category {} (already scraped at {})",
            category.name, category.last_updated
        );
    }
    pending
}

async fn save_counters(store: &Store, session: &SessionState) {
    if let Err(e) = store.update_session_counters(session).await {
        error!("Failed to update session counters: {e}");
    }
}

/// Sequences one scraping session over a prepared context.
pub struct Scraper {
    ctx: ScrapeContext,
    targets: Vec<String>,
    rescrape: bool,
    skip_details: bool,
    output_dir: PathBuf,
}

impl Scraper {
    /// Creates a scraper that takes its targets and switches from `config`.
    pub fn new(ctx: ScrapeContext, config: &Config) -> Self {
        Self {
            ctx,
            targets: config.categories.clone(),
            rescrape: config.rescrape,
            skip_details: config.skip_details,
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn context(&self) -> &ScrapeContext {
        &self.ctx
    }

    /// Runs every step of the session, updating `session` as work completes.
    ///
    /// One category's or one agency's failure is logged and never stops its
    /// siblings. Only a failed discovery, an empty directory or a failed
    /// export ends the run with an error.
    ///
    /// # Returns
    ///
    /// Row counts of the exported CSV files.
    pub async fn run(&self, session: &mut SessionState) -> Result<ExportSummary> {
        let store = &self.ctx.store;

        let discovered = discover_categories(&self.ctx)
            .await
            .context("Category discovery failed")?;
        if discovered.is_empty() {
            bail!("No categories found on the directory page");
        }

        let selected = select_targets(discovered, &self.targets);
        info!("Found {} matching categories", selected.len());
        let selected = drop_finished(selected, self.rescrape);

        session.categories_total = selected.len() as i64;
        session.agencies_total = selected.iter().map(|c| c.agency_count).sum();
        save_counters(store, session).await;
        info!(
            "Scraping {} categories (about {} agencies)",
            session.categories_total, session.agencies_total
        );

        for category in &selected {
            match scrape_category(&self.ctx, category, session).await {
                Ok(outcome) => info!(
                    "Category {} done: {} agencies, {} page(s), ended by {:?}",
                    category.name, outcome.agencies_collected, outcome.pages, outcome.end
                ),
                Err(e) => error!("Error getting agencies for category {}: {e}", category.name),
            }
        }

        if self.skip_details {
            info!("Skipping detail pages");
        } else {
            self.backfill_details(session).await;
        }

        export_csv(store, &self.output_dir)
            .await
            .context("CSV export failed")
    }

    /// Fetches detail pages for every agency still lacking one, including
    /// agencies stored by earlier runs.
    pub async fn backfill_details(&self, session: &mut SessionState) {
        let store = &self.ctx.store;
        let pending = match store.agencies_pending_detail().await {
            Ok(pending) => pending,
            Err(e) => {
                error!("Cannot list agencies without details: {e}");
                return;
            }
        };
        if pending.is_empty() {
            info!("No agencies found without detailed descriptions");
            return;
        }

        session.details_total = pending.len() as i64;
        save_counters(store, session).await;
        info!("Found {} agencies needing detailed descriptions", pending.len());

        let delay = self.ctx.navigator.timing().detail_request_delay;
        for (i, agency) in pending.iter().enumerate() {
            if i > 0 {
                sleep(delay).await;
            }
            match fetch_detail(&self.ctx, agency.id, &agency.name, Some(&agency.detail_url)).await {
                Ok(Some(_)) => {
                    session.details_scraped += 1;
                    save_counters(store, session).await;
                }
                Ok(None) => {}
                Err(e) => error!("Error getting detailed description for {}: {e}", agency.name),
            }
        }
        info!(
            "Completed scraping detailed descriptions for {}/{} agencies",
            session.details_scraped, session.details_total
        );
    }
}
