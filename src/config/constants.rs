//! Configuration constants.
//!
//! This module defines the constants used throughout the application: the target
//! site's origin and fixed paths, navigation timeouts, retry bounds, and the
//! defaults for the command-line options.

use std::time::Duration;

// Target site
/// Origin every relative link on the directory is resolved against.
pub const DEFAULT_BASE_URL: &str = "https://www.i-boss.co.kr";
/// Path of the directory page that lists every agency category.
pub const DIRECTORY_PATH: &str = "/ab-7553";
/// Path prefix of an agency detail page; the agency's numeric `idx` is appended.
pub const DETAIL_PATH_PREFIX: &str = "/ab-7554-";

/// Marker stored in place of a listing field the page did not provide.
///
/// Distinct from NULL: NULL means "never extracted" (e.g. no `idx`), while the
/// sentinel means "looked for it and the markup had nothing".
pub const UNAVAILABLE: &str = "N/A";

// CLI defaults
/// Categories targeted when `--categories` is not given.
pub const DEFAULT_CATEGORIES: &[&str] = &["종합광고대행사", "페이스북"];
/// Agencies collected per category when `--num-agencies` is not given (0 means all).
pub const DEFAULT_AGENCIES_PER_CATEGORY: usize = 3;
/// Default SQLite file name. Only the file name is used; it lives in the output directory.
pub const DB_PATH: &str = "./iboss_scraper.db";
/// Default WebDriver endpoint (chromedriver's default port).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
/// Subdirectory of the output directory that receives downloaded logos.
pub const LOGOS_DIR_NAME: &str = "logos";

// Browser window
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

// Navigation
/// Attempts for category and listing navigation (initial attempt included).
pub const NAVIGATION_MAX_ATTEMPTS: usize = 3;
/// Attempts for detail-page navigation. Lower than listing navigation: a missing
/// detail is cheap to pick up on the next run.
pub const DETAIL_NAVIGATION_MAX_ATTEMPTS: usize = 2;
/// Fixed delay between navigation attempts.
pub const NAVIGATION_RETRY_BACKOFF: Duration = Duration::from_secs(2);
/// Upper bound for the DOM-loaded and network-quiet wait (also the browser's page-load timeout).
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);
/// Hardcoded delay after a navigation has settled. The site keeps rendering after
/// its load events fire, so event-based waiting alone is not enough.
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);
/// Hardcoded delay after activating a pagination control.
pub const PAGE_ADVANCE_DELAY: Duration = Duration::from_secs(3);
/// How long to wait for listing entries to appear after opening a category.
pub const LISTING_WAIT_TIMEOUT: Duration = Duration::from_secs(10);
/// Extra grace delay when listing entries did not appear within `LISTING_WAIT_TIMEOUT`.
pub const LISTING_GRACE_DELAY: Duration = Duration::from_secs(5);
/// Per-selector wait on detail pages.
pub const DETAIL_SELECTOR_TIMEOUT: Duration = Duration::from_secs(3);
/// Delay between consecutive detail fetches.
pub const DETAIL_REQUEST_DELAY: Duration = Duration::from_millis(500);
/// Interval at which page snapshots are re-read while waiting for a selector.
pub const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

// Pagination bounds
/// Hard limit on pages walked in one category.
pub const MAX_PAGES_PER_CATEGORY: usize = 1000;

// Downloads
/// Timeout for a single logo download.
pub const LOGO_FETCH_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent for logo downloads.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

// Text limits
/// Character budget for the whole-page text used when no detail selector matched.
pub const MAX_BODY_TEXT_CHARS: usize = 1000;
/// Maximum HTML preview length in characters for debug logging.
pub const MAX_HTML_PREVIEW_CHARS: usize = 200;

// Export file names
pub const CATEGORIES_CSV: &str = "categories.csv";
pub const AGENCIES_CSV: &str = "agencies.csv";
pub const SESSIONS_CSV: &str = "scraping_status.csv";
