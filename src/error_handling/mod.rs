//! Error handling.
//!
//! This module provides the error types for every layer:
//! - **Initialization**: logger, HTTP client, browser session, output directories
//! - **Database**: file creation, SQL, migrations
//! - **Browser / Navigation**: driver command failures, timeouts, exhausted retries
//! - **Scrape**: a unit of work (category or agency) that did not complete
//!
//! Missing or relocated markup is never an error; the `parse` module resolves
//! it with selector fallbacks and sentinel values.

mod types;

// Re-export public API
pub use types::{BrowserError, DatabaseError, InitializationError, NavigationError, ScrapeError};
