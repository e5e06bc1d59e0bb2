//! Paginated listing traversal for one category.

use std::collections::HashSet;

use tokio::time::sleep;

use crate::config::{MAX_PAGES_PER_CATEGORY, NAVIGATION_MAX_ATTEMPTS};
use crate::error_handling::ScrapeError;
use crate::fetch::{download_logo, ScrapeContext};
use crate::parse::{
    decide_page_advance, detail_url, parse_idx, parse_listing, LastPageReason, ListingEntry,
    PageAdvance, ENTRY_SELECTORS,
};
use crate::storage::{Category, NewAgency, SessionState};
use crate::utils::sanitize::{preview, sanitize_file_component};

/// How a category traversal ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalEnd {
    /// The last page had no usable "next" control
    LastPage,
    /// The per-category cap was reached
    CapReached,
    /// Advancing produced the entries of a page already read
    Stalled,
    /// The hard page limit was reached
    PageLimit,
}

/// Result of walking one category's listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    /// Distinct agencies persisted for this category during this traversal
    pub agencies_collected: usize,
    /// Listing pages read
    pub pages: usize,
    pub end: TraversalEnd,
}

/// Stores one listing entry: derives `idx` and the detail URL, fetches the
/// logo, then upserts.
async fn persist_entry(
    ctx: &ScrapeContext,
    category: &Category,
    entry: &ListingEntry,
) -> Result<i64, ScrapeError> {
    let base_url = ctx.navigator.base_url();
    let idx = entry.href.as_deref().and_then(parse_idx);
    let detail = idx.as_deref().map(|i| detail_url(base_url, i));
    if idx.is_none() {
        log::debug!("No idx for {}; it will not get a detail page", entry.name);
    }

    let local_logo_path = if entry.has_logo() {
        download_logo(
            &ctx.client,
            &entry.logo_src,
            base_url,
            &ctx.logos_dir,
            &category.name,
            &entry.name,
        )
        .await
    } else {
        None
    };

    let agency = NewAgency {
        category_id: category.id,
        category_name: category.name.clone(),
        name: entry.name.clone(),
        url: Some(entry.url.clone()),
        logo_url: Some(entry.logo_src.clone()),
        local_logo_path,
        description: Some(entry.description.clone()),
        idx,
        detail_url: detail,
    };
    Ok(ctx.store.upsert_agency(&agency).await?)
}

/// Walks every listing page of `category`, persisting each agency.
///
/// One entry's failure is logged and skipped; it never stops the rest of the
/// page. Collection stops once `ctx.agency_cap` distinct agencies are stored,
/// or when a page lists exactly the names of any page already read (a "next"
/// control that leads back). After the last page the category is marked
/// scraped and `session` is updated.
///
/// # Errors
///
/// Returns an error when the listing cannot be opened, a page cannot be read
/// or advanced, or the category cannot be marked scraped. The category then
/// stays pending for the next run.
pub async fn scrape_category(
    ctx: &ScrapeContext,
    category: &Category,
    session: &mut SessionState,
) -> Result<CategoryOutcome, ScrapeError> {
    log::info!("Extracting agencies for category: {}", category.name);
    let navigator = &ctx.navigator;
    let timing = navigator.timing();

    navigator
        .navigate(&category.link, NAVIGATION_MAX_ATTEMPTS)
        .await?;
    if navigator
        .wait_for_selector(ENTRY_SELECTORS[0], timing.listing_wait)
        .await?
        .is_none()
    {
        log::warn!(
            "Listing entries did not appear for {}; waiting {:?} more",
            category.name,
            timing.listing_grace_delay
        );
        sleep(timing.listing_grace_delay).await;
    }

    let mut stored_ids: HashSet<i64> = HashSet::new();
    let mut seen_pages: HashSet<Vec<String>> = HashSet::new();
    let mut pages = 0usize;

    let end = loop {
        if pages >= MAX_PAGES_PER_CATEGORY {
            log::warn!(
                "Stopping {} after {MAX_PAGES_PER_CATEGORY} pages",
                category.name
            );
            break TraversalEnd::PageLimit;
        }
        pages += 1;

        let html = navigator.snapshot().await?;
        let listing = parse_listing(&html);
        log::info!(
            "Processing page {pages} of {}: {} agencies",
            category.name,
            listing.entries.len()
        );
        if let Some(first) = &listing.first_entry_html {
            log::debug!("First entry markup: {}", preview(first, 200));
        }

        let names: Vec<String> = listing.names().into_iter().map(str::to_string).collect();
        if !seen_pages.insert(names) {
            log::warn!(
                "Page {pages} of {} repeats a page already read; stopping",
                category.name
            );
            break TraversalEnd::Stalled;
        }

        for (position, entry) in listing.entries.iter().enumerate() {
            if ctx.agency_cap.is_some_and(|cap| stored_ids.len() >= cap) {
                break;
            }
            log::debug!(
                "Processing agency {}/{}: {}",
                position + 1,
                listing.entries.len(),
                entry.name
            );
            match persist_entry(ctx, category, entry).await {
                Ok(id) if stored_ids.insert(id) => {
                    session.agencies_scraped += 1;
                    if let Err(e) = ctx.store.update_session_counters(session).await {
                        log::error!("Failed to update session counters: {e}");
                    }
                    log::info!("Successfully processed agency: {}", entry.name);
                }
                Ok(_) => log::debug!("Agency {} already stored this traversal", entry.name),
                Err(e) => log::error!(
                    "Error storing agency {} ({}): {e}",
                    position + 1,
                    entry.name
                ),
            }
        }

        if let Some(cap) = ctx.agency_cap.filter(|cap| stored_ids.len() >= *cap) {
            log::info!(
                "Reached maximum number of agencies ({cap}) for category {}",
                category.name
            );
            break TraversalEnd::CapReached;
        }

        match decide_page_advance(&html) {
            PageAdvance::Next { target, label } => {
                log::info!("Advancing to page {} via {label:?}", pages + 1);
                navigator.click_and_settle(&target).await?;
            }
            PageAdvance::LastPage(reason) => {
                log::info!("Reached last page of {} ({reason:?})", category.name);
                if reason == LastPageReason::NoControl {
                    let file = format!(
                        "pagination_debug_{}_{pages}.png",
                        sanitize_file_component(&category.name)
                    );
                    navigator.save_screenshot(&ctx.debug_dir.join(file)).await;
                }
                break TraversalEnd::LastPage;
            }
        }
    };

    let collected = stored_ids.len();
    ctx.store.mark_category_scraped(category.id).await?;
    session.categories_scraped += 1;
    if let Err(e) = ctx.store.update_session_counters(session).await {
        log::error!("Failed to update session counters: {e}");
    }
    log::info!(
        "Extracted {collected} agencies for category {} over {pages} page(s)",
        category.name
    );

    Ok(CategoryOutcome {
        agencies_collected: collected,
        pages,
        end,
    })
}
