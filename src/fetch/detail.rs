//! Agency detail pages.

use crate::config::{
    DETAIL_NAVIGATION_MAX_ATTEMPTS, DETAIL_PATH_PREFIX, MAX_BODY_TEXT_CHARS, UNAVAILABLE,
};
use crate::error_handling::ScrapeError;
use crate::fetch::ScrapeContext;
use crate::parse::{body_text, parse_detail_description, DETAIL_SELECTORS};
use crate::utils::sanitize::{preview, sanitize_file_component};

/// Screenshot name for a detail page: `debug_<idx>.png`, keyed by the agency
/// id when the URL does not end in an idx.
fn debug_screenshot_name(detail_url: &str, agency_id: i64) -> String {
    let key = detail_url
        .rsplit_once(DETAIL_PATH_PREFIX)
        .map(|(_, idx)| idx.trim_end_matches('/'))
        .filter(|idx| !idx.is_empty())
        .map_or_else(|| agency_id.to_string(), sanitize_file_component);
    format!("debug_{key}.png")
}

/// Fetches and stores the long-form description of one agency.
///
/// Each content selector gets its own short wait; the first one with text
/// wins. When none matches, a debug screenshot is saved and the page's whole
/// visible text (normalized and bounded) is stored instead. A page with no
/// visible text at all stores `UNAVAILABLE`, so it is not fetched again.
///
/// # Returns
///
/// The stored text, or `None` when the agency has no detail URL (nothing is
/// written then).
///
/// # Errors
///
/// Returns an error when the page cannot be opened or read, or the store
/// rejects the write.
pub async fn fetch_detail(
    ctx: &ScrapeContext,
    agency_id: i64,
    agency_name: &str,
    detail_url: Option<&str>,
) -> Result<Option<String>, ScrapeError> {
    let Some(detail_url) = detail_url.filter(|u| !u.trim().is_empty()) else {
        log::debug!("No detail URL for agency {agency_name}, skipping");
        return Ok(None);
    };

    log::info!("Getting detailed description for agency: {agency_name}");
    let navigator = &ctx.navigator;
    navigator
        .navigate(detail_url, DETAIL_NAVIGATION_MAX_ATTEMPTS)
        .await?;

    let mut description = None;
    for selector in DETAIL_SELECTORS {
        let timeout = navigator.timing().detail_selector_timeout;
        if let Some(html) = navigator.wait_for_selector(selector, timeout).await? {
            if let Some(text) = parse_detail_description(&html, selector) {
                log::debug!("Found detail description using selector: {selector}");
                description = Some(text);
                break;
            }
        }
        log::debug!("Selector {selector} not found, trying next");
    }

    let description = match description {
        Some(text) => text,
        None => {
            let screenshot = ctx.debug_dir.join(debug_screenshot_name(detail_url, agency_id));
            navigator.save_screenshot(&screenshot).await;
            let html = navigator.snapshot().await?;
            match body_text(&html, MAX_BODY_TEXT_CHARS) {
                Some(text) => {
                    log::warn!(
                        "All detail selectors failed for {agency_name}; using page text: {}",
                        preview(&text, 100)
                    );
                    text
                }
                None => {
                    log::warn!(
                        "No text content found for {agency_name}; storing {UNAVAILABLE:?}"
                    );
                    UNAVAILABLE.to_string()
                }
            }
        }
    };

    ctx.store
        .record_agency_detail(agency_id, &description)
        .await?;
    Ok(Some(description))
}
