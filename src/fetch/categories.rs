//! Category discovery on the directory page.

use crate::config::{DIRECTORY_PATH, NAVIGATION_MAX_ATTEMPTS};
use crate::error_handling::ScrapeError;
use crate::fetch::ScrapeContext;
use crate::parse::{parse_categories, CATEGORY_SELECTORS};
use crate::storage::{Category, NewCategory};

/// Opens the directory page and upserts every category it lists.
///
/// Anchors that cannot be resolved or stored are logged and skipped.
///
/// # Returns
///
/// The stored categories in page order. Empty when the page listed none.
///
/// # Errors
///
/// Returns an error when the directory page cannot be opened or read.
pub async fn discover_categories(ctx: &ScrapeContext) -> Result<Vec<Category>, ScrapeError> {
    let navigator = &ctx.navigator;
    navigator
        .navigate(DIRECTORY_PATH, NAVIGATION_MAX_ATTEMPTS)
        .await?;

    let html = match navigator
        .wait_for_selector(CATEGORY_SELECTORS[0], navigator.timing().listing_wait)
        .await?
    {
        Some(html) => html,
        None => {
            log::warn!("Category list did not appear in time; trying the fallback selector");
            navigator.snapshot().await?
        }
    };

    let anchors = parse_categories(&html);
    log::info!("Found {} category anchors", anchors.len());

    let mut ids = Vec::with_capacity(anchors.len());
    for anchor in anchors {
        let link = match navigator.resolve(&anchor.href) {
            Ok(link) => link,
            Err(e) => {
                log::warn!("Skipping category {}: {e}", anchor.name);
                continue;
            }
        };
        let category = NewCategory {
            name: anchor.name,
            link,
            agency_count: anchor.agency_count,
        };
        match ctx.store.upsert_category(&category).await {
            Ok(id) if !ids.contains(&id) => ids.push(id),
            Ok(_) => log::debug!("Category {} listed twice", category.name),
            Err(e) => log::error!("Failed to store category {}: {e}", category.name),
        }
    }

    let stored = ctx.store.all_categories().await?;
    let categories: Vec<Category> = ids
        .iter()
        .filter_map(|id| stored.iter().find(|c| c.id == *id).cloned())
        .collect();
    log::info!("Extracted {} categories", categories.len());
    Ok(categories)
}
