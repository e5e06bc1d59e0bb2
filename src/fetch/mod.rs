//! Browser-driven scraping steps.
//!
//! This module contains the steps that talk to the site:
//! - `Navigator`: retrying navigation, settled-page waits, selector polling
//! - Category discovery on the directory page
//! - Paginated listing traversal per category, with logo downloads
//! - Detail page fetching with a whole-page text fallback

mod categories;
mod context;
mod detail;
mod listing;
mod logo;
mod navigator;

pub use categories::discover_categories;
pub use context::ScrapeContext;
pub use detail::fetch_detail;
pub use listing::{scrape_category, CategoryOutcome, TraversalEnd};
pub use logo::download_logo;
pub use navigator::Navigator;

#[cfg(test)]
pub(crate) fn test_timing() -> crate::config::Timing {
    use std::time::Duration;

    crate::config::Timing {
        settle_timeout: Duration::from_millis(50),
        settle_delay: Duration::ZERO,
        page_advance_delay: Duration::ZERO,
        retry_backoff: Duration::ZERO,
        listing_wait: Duration::from_millis(10),
        listing_grace_delay: Duration::ZERO,
        detail_selector_timeout: Duration::from_millis(10),
        detail_request_delay: Duration::ZERO,
        poll_interval: Duration::from_millis(1),
    }
}

/// A context over a static driver, an in-memory store and a temporary output
/// directory (logos under `logos/`, screenshots at its root).
#[cfg(test)]
pub(crate) async fn test_context(
    driver: crate::browser::testing::StaticDriver,
    agency_cap: Option<usize>,
) -> (ScrapeContext, tempfile::TempDir) {
    use std::sync::Arc;

    let dir = tempfile::TempDir::new().expect("temp dir");
    std::fs::create_dir_all(dir.path().join("logos")).expect("logos dir");
    let navigator = Navigator::new(Arc::new(driver), "https://example.test", test_timing())
        .expect("navigator");
    let store = crate::storage::test_helpers::create_test_store().await;
    let ctx = ScrapeContext::new(
        navigator,
        store,
        Arc::new(reqwest::Client::new()),
        dir.path().join("logos"),
        dir.path().to_path_buf(),
        agency_cap,
    );
    (ctx, dir)
}
